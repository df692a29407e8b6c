// Copyright (c) 2024 Mike Tsao

//! Wrappers around MIDI I/O crates that make them easier to use with
//! crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{CrossbeamChannel, ProvidesService};
    #[cfg(feature = "midi")]
    pub use super::{MidiPlayer, MidiService, MidiServiceEvent, MidiServiceInput};
}

#[cfg(feature = "midi")]
pub use midi::{MidiService, MidiServiceEvent, MidiServiceInput};
#[cfg(feature = "midi")]
pub use player::MidiPlayer;
pub use service::{CrossbeamChannel, ProvidesService};

#[cfg(feature = "midi")]
mod midi;
#[cfg(feature = "midi")]
mod player;
mod service;
