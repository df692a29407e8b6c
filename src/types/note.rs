// Copyright (c) 2024 Mike Tsao

use super::{u7, DurationCategory, MidiMessage, Seconds, Tempo};
use crate::error::MarkovError;

/// A note as the learning model sees it: a pitch and how long it sounded.
/// Only the recorder (while learning) and the generator create these.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LearnedNote {
    /// The MIDI key.
    pub key: u7,
    /// The quantized length.
    pub duration: DurationCategory,
}
impl LearnedNote {
    #[allow(missing_docs)]
    pub fn new_with(key: u7, duration: DurationCategory) -> Self {
        Self { key, duration }
    }

    /// Like [LearnedNote::new_with()], but from a raw key number that might
    /// be out of range.
    pub fn try_new_with(key: u8, duration: DurationCategory) -> Result<Self, MarkovError> {
        if key > 127 {
            return Err(MarkovError::InvalidKey(key));
        }
        Ok(Self::new_with(u7::from_int_lossy(key), duration))
    }

    /// The key as a matrix index.
    pub fn key_index(&self) -> usize {
        self.key.as_int() as usize
    }
}

/// What the generator hands to a player. Onsets carry the length they should
/// be held for; offsets simply end the previous onset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MelodyEvent {
    #[allow(missing_docs)]
    NoteOn {
        key: u7,
        vel: u7,
        duration: DurationCategory,
    },
    #[allow(missing_docs)]
    NoteOff { key: u7 },
}
impl MelodyEvent {
    /// The key this event refers to.
    pub fn key(&self) -> u7 {
        match self {
            MelodyEvent::NoteOn { key, .. } | MelodyEvent::NoteOff { key } => *key,
        }
    }

    /// Whether this is an onset.
    pub fn is_note_on(&self) -> bool {
        matches!(self, MelodyEvent::NoteOn { .. })
    }

    /// How long a player must wait after sending this event before sending
    /// the next one. An onset is held for its duration (`beats * 60 / bpm`
    /// seconds); an offset doesn't wait.
    pub fn hold_time(&self, tempo: Tempo) -> Seconds {
        match self {
            MelodyEvent::NoteOn { duration, .. } => tempo.seconds_for(duration.beats()),
            MelodyEvent::NoteOff { .. } => Seconds::zero(),
        }
    }

    /// The wire-level equivalent of this event.
    pub fn to_midi_message(&self) -> MidiMessage {
        match *self {
            MelodyEvent::NoteOn { key, vel, .. } => MidiMessage::NoteOn { key, vel },
            MelodyEvent::NoteOff { key } => MidiMessage::NoteOff {
                key,
                vel: u7::from(0),
            },
        }
    }
}
