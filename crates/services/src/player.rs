// Copyright (c) 2024 Mike Tsao

//! Performs generated melodies in real time.

use crate::midi::MidiServiceInput;
use crossbeam::channel::Sender;
use ensnare_markov::prelude::*;

/// Sends [MelodyEvent]s to a MIDI output, blocking for each onset's hold time
/// so that the output sounds in tempo.
#[derive(Debug)]
pub struct MidiPlayer {
    sender: Sender<MidiServiceInput>,
    channel: MidiChannel,
}
impl PlaysMelodies for MidiPlayer {
    fn play(&mut self, event: &MelodyEvent, tempo: Tempo) {
        if let Err(e) = self
            .sender
            .send(MidiServiceInput::Midi(self.channel, event.to_midi_message()))
        {
            log::warn!("MidiPlayer: While sending: {e:?}");
        }
        let hold_time = event.hold_time(tempo);
        if hold_time.0 > 0.0 {
            std::thread::sleep(hold_time.into());
        }
    }
}
impl MidiPlayer {
    /// `sender` is usually a clone of a
    /// [MidiService](crate::MidiService)'s sender.
    pub fn new_with(sender: Sender<MidiServiceInput>, channel: MidiChannel) -> Self {
        Self { sender, channel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrossbeamChannel;
    use ensnare_markov::types::u7;
    use more_asserts::assert_ge;
    use std::time::Instant;

    #[test]
    fn plays_in_order_and_in_tempo() {
        let channel = CrossbeamChannel::<MidiServiceInput>::default();
        let mut player = MidiPlayer::new_with(channel.sender.clone(), MidiChannel::default());
        let melody = [
            MelodyEvent::NoteOn {
                key: u7::from(60),
                vel: u7::from(100),
                duration: DurationCategory::Sixteenth,
            },
            MelodyEvent::NoteOff { key: u7::from(60) },
            MelodyEvent::NoteOn {
                key: u7::from(64),
                vel: u7::from(100),
                duration: DurationCategory::Sixteenth,
            },
            MelodyEvent::NoteOff { key: u7::from(64) },
        ];

        // A sixteenth at 240 BPM is 62.5ms.
        let start = Instant::now();
        player.play_all(&melody, Tempo(240.0));
        assert_ge!(start.elapsed().as_secs_f64(), 0.124);

        let sent: Vec<_> = channel.receiver.try_iter().collect();
        assert_eq!(sent.len(), 4);
        for (input, event) in sent.iter().zip(melody.iter()) {
            match input {
                MidiServiceInput::Midi(ch, message) => {
                    assert_eq!(*ch, MidiChannel::default());
                    assert_eq!(*message, event.to_midi_message());
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
