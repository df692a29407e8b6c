// Copyright (c) 2024 Mike Tsao

use super::DurationQuantizer;
use crate::{prelude::*, types::u7};
use delegate::delegate;

/// [PolyphonyTracker] watches a note stream and remembers when each currently
/// sounding key started. It holds at most one onset per key.
///
/// [PolyphonyTracker] doesn't know about [MidiChannel]s. It's up to the caller
/// to decide which messages are for it.
#[derive(Debug)]
pub struct PolyphonyTracker {
    onsets: [Option<Seconds>; 128],
}
impl Default for PolyphonyTracker {
    fn default() -> Self {
        Self {
            onsets: [None; 128],
        }
    }
}
impl PolyphonyTracker {
    /// When the key started sounding, if it's sounding.
    pub fn onset(&self, key: u7) -> Option<Seconds> {
        self.onsets[key.as_int() as usize]
    }

    /// Marks the key as sounding since `when`, returning the previous onset
    /// if there was one.
    pub fn start(&mut self, key: u7, when: Seconds) -> Option<Seconds> {
        self.onsets[key.as_int() as usize].replace(when)
    }

    /// Marks the key as silent, returning its onset if it was sounding.
    pub fn stop(&mut self, key: u7) -> Option<Seconds> {
        self.onsets[key.as_int() as usize].take()
    }

    /// How many keys are currently sounding.
    pub fn active_count(&self) -> usize {
        self.onsets.iter().filter(|o| o.is_some()).count()
    }

    /// Forgets all onsets.
    pub fn clear(&mut self) {
        self.onsets = [None; 128];
    }
}

/// [EventStreamRecorder] pairs onsets with offsets and keeps the resulting
/// quantized notes, in the order they ended. This is the training data for
/// [TransitionMatrices](super::TransitionMatrices).
///
/// Input is expected to be monophonic and well-formed, but it won't always
/// be. A second onset for a key that's already sounding is treated as an
/// offset immediately followed by a new onset. An offset for a key that isn't
/// sounding is ignored. A note so short that it quantizes to
/// [DurationCategory::NoiseThreshold] is dropped.
#[derive(Debug, Default)]
pub struct EventStreamRecorder {
    tracker: PolyphonyTracker,
    quantizer: DurationQuantizer,
    stream: Vec<LearnedNote>,
}
impl Configurable for EventStreamRecorder {
    delegate! {
        to self.quantizer {
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }

    fn reset(&mut self) {
        self.clear();
    }
}
impl HandlesMidi for EventStreamRecorder {
    fn handle_midi_message(
        &mut self,
        when: Seconds,
        _channel: MidiChannel,
        message: MidiMessage,
        _: &mut MelodyEventsFn,
    ) {
        match message {
            MidiMessage::NoteOn { key, vel: _ } => {
                let _ = self.note_on(key, when);
            }
            MidiMessage::NoteOff { key, vel: _ } => {
                let _ = self.note_off(key, when);
            }
            _ => {}
        }
    }
}
impl EventStreamRecorder {
    #[allow(missing_docs)]
    pub fn new_with(tempo: Tempo) -> Self {
        Self {
            quantizer: DurationQuantizer::new_with(tempo),
            ..Default::default()
        }
    }

    /// Handles an onset. Returns the note that was implicitly ended, if this
    /// onset arrived while the same key was still sounding.
    pub fn note_on(&mut self, key: u7, when: Seconds) -> Option<LearnedNote> {
        // The onset restarts at `when` whether or not the implied note was
        // long enough to keep.
        match self.tracker.start(key, when) {
            Some(onset) => {
                log::debug!(
                    "key {} restruck while sounding; treating as note-off",
                    key.as_int()
                );
                self.finish_note(key, when - onset)
            }
            None => None,
        }
    }

    /// Handles an offset. Returns the finished note, unless there was no
    /// matching onset or the note was too short to count.
    pub fn note_off(&mut self, key: u7, when: Seconds) -> Option<LearnedNote> {
        match self.tracker.stop(key) {
            Some(onset) => self.finish_note(key, when - onset),
            None => {
                log::trace!("ignoring note-off for silent key {}", key.as_int());
                None
            }
        }
    }

    fn finish_note(&mut self, key: u7, elapsed: Seconds) -> Option<LearnedNote> {
        let duration = self.quantizer.quantize(elapsed);
        if duration.is_noise() {
            log::trace!(
                "dropping {:.3}s note on key {} as noise",
                elapsed.0,
                key.as_int()
            );
            return None;
        }
        let note = LearnedNote::new_with(key, duration);
        log::debug!("recorded key {} for {duration}", key.as_int());
        self.stream.push(note);
        Some(note)
    }

    /// The notes recorded so far.
    pub fn stream(&self) -> &[LearnedNote] {
        &self.stream
    }

    /// The onsets still waiting for offsets.
    pub fn tracker(&self) -> &PolyphonyTracker {
        &self.tracker
    }

    /// Begins a new recording epoch: forgets all notes and pending onsets.
    pub fn clear(&mut self) {
        self.stream.clear();
        self.tracker.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MidiUtils;

    fn key(k: u8) -> u7 {
        u7::from(k)
    }

    #[test]
    fn polyphony_tracker() {
        let mut t = PolyphonyTracker::default();
        assert_eq!(t.active_count(), 0);
        assert_eq!(t.start(key(60), Seconds(1.0)), None);
        assert_eq!(t.onset(key(60)), Some(Seconds(1.0)));
        assert_eq!(t.start(key(60), Seconds(2.0)), Some(Seconds(1.0)));
        assert_eq!(t.active_count(), 1);
        assert_eq!(t.stop(key(60)), Some(Seconds(2.0)));
        assert_eq!(t.stop(key(60)), None);
        t.start(key(1), Seconds(0.0));
        t.start(key(127), Seconds(0.0));
        assert_eq!(t.active_count(), 2);
        t.clear();
        assert_eq!(t.active_count(), 0);
    }

    #[test]
    fn well_formed_notes() {
        let mut r = EventStreamRecorder::new_with(Tempo(60.0));
        assert_eq!(r.note_on(key(60), Seconds(0.0)), None);
        assert_eq!(
            r.note_off(key(60), Seconds(1.0)),
            Some(LearnedNote::new_with(key(60), DurationCategory::Quarter))
        );
        assert_eq!(r.note_on(key(62), Seconds(1.0)), None);
        assert_eq!(
            r.note_off(key(62), Seconds(1.5)),
            Some(LearnedNote::new_with(key(62), DurationCategory::Eighth))
        );
        assert_eq!(r.stream().len(), 2);
        assert_eq!(r.tracker().active_count(), 0);
    }

    #[test]
    fn restrike_produces_exactly_one_implicit_note() {
        let mut r = EventStreamRecorder::new_with(Tempo(60.0));
        r.note_on(key(64), Seconds(0.0));
        let implicit = r.note_on(key(64), Seconds(2.0));
        assert_eq!(
            implicit,
            Some(LearnedNote::new_with(key(64), DurationCategory::Half))
        );
        assert_eq!(r.stream().len(), 1);
        assert_eq!(r.tracker().onset(key(64)), Some(Seconds(2.0)));

        // The new onset is measured from the restrike.
        assert_eq!(
            r.note_off(key(64), Seconds(3.0)),
            Some(LearnedNote::new_with(key(64), DurationCategory::Quarter))
        );
        assert_eq!(r.stream().len(), 2);
    }

    #[test]
    fn noise_is_dropped() {
        let mut r = EventStreamRecorder::new_with(Tempo(60.0));
        r.note_on(key(60), Seconds(10.0));
        assert_eq!(r.note_off(key(60), Seconds(10.01)), None);
        assert!(r.stream().is_empty());
        // A noise-length offset still ends the note.
        assert_eq!(r.tracker().onset(key(60)), None);

        // A noise-length restrike keeps tracking from the restrike.
        r.note_on(key(61), Seconds(20.0));
        assert_eq!(r.note_on(key(61), Seconds(20.01)), None);
        assert_eq!(r.tracker().onset(key(61)), Some(Seconds(20.01)));
        assert!(r.stream().is_empty());
    }

    #[test]
    fn stray_offsets_are_ignored() {
        let mut r = EventStreamRecorder::default();
        assert_eq!(r.note_off(key(50), Seconds(1.0)), None);
        assert!(r.stream().is_empty());
    }

    #[test]
    fn handles_midi_messages() {
        let mut r = EventStreamRecorder::new_with(Tempo(120.0));
        r.handle_midi_message(
            Seconds(0.0),
            MidiChannel::default(),
            MidiUtils::new_note_on(70, 99),
            &mut |_| panic!("recording shouldn't produce output"),
        );
        r.handle_midi_message(
            Seconds(1.0),
            MidiChannel::default(),
            MidiUtils::new_note_off(70, 0),
            &mut |_| panic!("recording shouldn't produce output"),
        );
        assert_eq!(
            r.stream(),
            &[LearnedNote::new_with(key(70), DurationCategory::Half)]
        );

        r.reset();
        assert!(r.stream().is_empty());
    }

    #[test]
    fn quantizes_at_current_tempo() {
        let mut r = EventStreamRecorder::new_with(Tempo(60.0));
        r.note_on(key(60), Seconds(0.0));
        r.update_tempo(Tempo(240.0));
        assert_eq!(
            r.note_off(key(60), Seconds(1.0)),
            Some(LearnedNote::new_with(key(60), DurationCategory::Whole))
        );
    }
}
