// Copyright (c) 2024 Mike Tsao

use super::matrix::{is_distribution, TransitionMatrices};
use crate::{error::MarkovError, prelude::*, types::u7};

/// Improvises a melody by walking [TransitionMatrices].
///
/// Each note is chosen from the rows for the previous note's key and duration
/// at the metrical position where the new note begins. If this position never
/// saw the previous note, the positions are scanned from the downbeat onward
/// for one that did. If none did, the melody starts over from the downbeat's
/// overall distribution, as if it were beginning again.
#[derive(Debug)]
pub struct MelodyGenerator<'a> {
    matrices: &'a TransitionMatrices,
    rng: &'a mut Rng,
    velocity: u7,
    beat_count: f64,
}
impl<'a> MelodyGenerator<'a> {
    #[allow(missing_docs)]
    pub fn new_with(matrices: &'a TransitionMatrices, rng: &'a mut Rng, velocity: u7) -> Self {
        Self {
            matrices,
            rng,
            velocity,
            beat_count: 0.0,
        }
    }

    /// Total beats generated so far in the current run.
    pub fn beat_count(&self) -> f64 {
        self.beat_count
    }

    /// Produces note-on/note-off pairs until at least `measures` measures
    /// have been filled. Every onset is followed by its offset before the
    /// next onset, and the final onset is closed.
    pub fn generate_melody(&mut self, measures: usize) -> Result<Vec<MelodyEvent>, MarkovError> {
        if measures == 0 {
            return Err(MarkovError::InvalidMeasures);
        }
        self.beat_count = 0.0;
        let end_beat = (measures * self.matrices.positions()) as f64;

        let mut melody = Vec::default();
        let mut current = self.first_note()?;
        melody.push(self.note_on(&current));
        while self.beat_count < end_beat {
            let next = self.next_note(&current)?;
            melody.push(MelodyEvent::NoteOff { key: current.key });
            melody.push(self.note_on(&next));
            current = next;
        }
        melody.push(MelodyEvent::NoteOff { key: current.key });

        log::info!(
            "generated {} notes over {} beats",
            melody.len() / 2,
            self.beat_count
        );
        Ok(melody)
    }

    /// Picks an opening note from the downbeat's aggregate distributions.
    pub fn first_note(&mut self) -> Result<LearnedNote, MarkovError> {
        let key = self
            .rng
            .choose_weighted(&self.matrices.pitch_marginal(0))
            .ok_or(MarkovError::EmptyDistribution)?;
        let duration = self
            .rng
            .choose_weighted(&self.matrices.duration_marginal(0))
            .and_then(DurationCategory::from_index)
            .ok_or(MarkovError::EmptyDistribution)?;
        let note = LearnedNote::try_new_with(key as u8, duration)?;
        self.advance(&note);
        Ok(note)
    }

    /// Picks the note that follows `current`.
    pub fn next_note(&mut self, current: &LearnedNote) -> Result<LearnedNote, MarkovError> {
        let position = self.current_position();
        let Some(pitch_row) = self.resolve_row(position, |m, p| m.pitch_row(p, current.key))
        else {
            log::debug!(
                "no observed successor of key {}; starting over",
                current.key.as_int()
            );
            return self.first_note();
        };
        let Some(duration_row) =
            self.resolve_row(position, |m, p| m.duration_row(p, current.duration))
        else {
            log::debug!(
                "no observed successor of {}; starting over",
                current.duration
            );
            return self.first_note();
        };

        let key = self
            .rng
            .choose_weighted(&pitch_row)
            .ok_or(MarkovError::EmptyDistribution)?;
        let duration = self
            .rng
            .choose_weighted(&duration_row)
            .and_then(DurationCategory::from_index)
            .ok_or(MarkovError::EmptyDistribution)?;
        let note = LearnedNote::try_new_with(key as u8, duration)?;
        log::trace!(
            "beat {:.3}: key {} for {}",
            self.beat_count,
            key,
            duration
        );
        self.advance(&note);
        Ok(note)
    }

    fn current_position(&self) -> usize {
        (self.beat_count.trunc() as usize) % self.matrices.positions()
    }

    // Returns the row at `position` if it has observations, otherwise the
    // first position's row, counting up from zero, that does.
    fn resolve_row<F>(&self, position: usize, row_at: F) -> Option<Vec<f64>>
    where
        F: Fn(&TransitionMatrices, usize) -> Vec<f64>,
    {
        let row = row_at(self.matrices, position);
        if is_distribution(&row) {
            return Some(row);
        }
        (0..self.matrices.positions()).find_map(|p| {
            let row = row_at(self.matrices, p);
            if is_distribution(&row) {
                log::trace!("position {position} unobserved; borrowing position {p}");
                Some(row)
            } else {
                None
            }
        })
    }

    fn advance(&mut self, note: &LearnedNote) {
        self.beat_count += note.duration.beats();
    }

    fn note_on(&self, note: &LearnedNote) -> MelodyEvent {
        MelodyEvent::NoteOn {
            key: note.key,
            vel: self.velocity,
            duration: note.duration,
        }
    }
}
