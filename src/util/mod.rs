// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{rng::Rng, CollectingPlayer, MidiUtils, SessionSettings};
}

pub use midi::MidiUtils;
pub use player::CollectingPlayer;
pub use rng::Rng;
pub use settings::{SessionSettings, SessionSettingsBuilder};

mod midi;
mod player;
mod rng;
mod settings;
