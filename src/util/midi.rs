// Copyright (c) 2024 Mike Tsao

use crate::types::{u4, u7, MidiChannel, MidiMessage};
use midly::live::LiveEvent;

/// Provides MIDI-related utility functionality.
pub struct MidiUtils {}
impl MidiUtils {
    /// Convenience function to make a note-on [MidiMessage].
    pub fn new_note_on(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Convenience function to make a note-off [MidiMessage].
    pub fn new_note_off(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Convenience function to make a control-change [MidiMessage].
    pub fn new_controller(controller: u8, value: u8) -> MidiMessage {
        MidiMessage::Controller {
            controller: u7::from(controller),
            value: u7::from(value),
        }
    }

    /// Decodes the raw bytes of a single message from a device. System and
    /// realtime messages (clock, sysex, etc.) aren't interesting here and
    /// come back as None, as does anything malformed. A note-on with zero
    /// velocity is returned as the note-off it means.
    pub fn parse(bytes: &[u8]) -> Option<(MidiChannel, MidiMessage)> {
        match LiveEvent::parse(bytes) {
            Ok(LiveEvent::Midi { channel, message }) => {
                let message = match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => {
                        MidiMessage::NoteOff { key, vel }
                    }
                    _ => message,
                };
                Some((MidiChannel::from(channel), message))
            }
            _ => None,
        }
    }

    /// Encodes a message for sending to a device.
    pub fn to_bytes(channel: MidiChannel, message: MidiMessage) -> std::io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(3);
        LiveEvent::Midi {
            channel: u4::from(channel),
            message,
        }
        .write_std(&mut bytes)?;
        Ok(bytes)
    }
}
