// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        DurationCategory, LearnedNote, MelodyEvent, MidiChannel, MidiMessage, Seconds, Tempo,
        TimeSignature,
    };
}

pub use {
    duration::DurationCategory,
    midi::{u4, u7, MidiChannel, MidiMessage, MidiPortDescriptor},
    note::{LearnedNote, MelodyEvent},
    time::{Seconds, Tempo, TimeSignature},
};

mod duration;
mod midi;
mod note;
mod time;
