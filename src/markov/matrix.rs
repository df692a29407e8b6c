// Copyright (c) 2024 Mike Tsao

use crate::{error::MarkovError, prelude::*, types::u7};
use nalgebra::DMatrix;

/// Rows whose sums are within this distance of 1.0 count as probability
/// distributions. Rows summing to less than this count as empty.
pub const ROW_SUM_EPSILON: f64 = 1e-9;

/// The number of distinct MIDI keys.
pub const KEY_COUNT: usize = 128;

/// Returns true if the row is a probability distribution, false if it
/// represents "never observed."
pub fn is_distribution(row: &[f64]) -> bool {
    (row.iter().sum::<f64>() - 1.0).abs() < ROW_SUM_EPSILON
}

/// First-order transition probabilities conditioned on metrical position.
///
/// For each position in the measure there's a key-to-key matrix (128x128)
/// and a duration-to-duration matrix (one row and column per
/// [DurationCategory]). Row `r` of position `p` is the distribution of what
/// followed `r` when `r` started on beat `p`. Every row either sums to 1 or
/// is all zero; an all-zero row is a first-class "no observation" state,
/// not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrices {
    pitch: Vec<DMatrix<f64>>,
    duration: Vec<DMatrix<f64>>,
}
impl TransitionMatrices {
    fn new_zeroed(positions: usize) -> Self {
        Self {
            pitch: (0..positions)
                .map(|_| DMatrix::zeros(KEY_COUNT, KEY_COUNT))
                .collect(),
            duration: (0..positions)
                .map(|_| DMatrix::zeros(DurationCategory::COUNT, DurationCategory::COUNT))
                .collect(),
        }
    }

    /// How many metrical positions these matrices distinguish. This is the
    /// meter's top number at the time they were built.
    pub fn positions(&self) -> usize {
        self.pitch.len()
    }

    /// The distribution of next keys after `key` sounded at `position`.
    pub fn pitch_row(&self, position: usize, key: u7) -> Vec<f64> {
        self.pitch[position]
            .row(key.as_int() as usize)
            .iter()
            .copied()
            .collect()
    }

    /// The distribution of next durations after `duration` sounded at
    /// `position`.
    pub fn duration_row(&self, position: usize, duration: DurationCategory) -> Vec<f64> {
        self.duration[position]
            .row(duration.index())
            .iter()
            .copied()
            .collect()
    }

    /// The probability that `to` followed `from` at `position`.
    pub fn pitch_probability(&self, position: usize, from: u7, to: u7) -> f64 {
        self.pitch[position][(from.as_int() as usize, to.as_int() as usize)]
    }

    /// The probability that `to` followed `from` at `position`.
    pub fn duration_probability(
        &self,
        position: usize,
        from: DurationCategory,
        to: DurationCategory,
    ) -> f64 {
        self.duration[position][(from.index(), to.index())]
    }

    /// Unnormalized weights of each key as a destination at `position`,
    /// summed over all source keys.
    pub fn pitch_marginal(&self, position: usize) -> Vec<f64> {
        Self::column_sums(&self.pitch[position])
    }

    /// Unnormalized weights of each duration as a destination at `position`,
    /// summed over all source durations.
    pub fn duration_marginal(&self, position: usize) -> Vec<f64> {
        Self::column_sums(&self.duration[position])
    }

    /// Checks that every row of every matrix is either empty or a
    /// distribution.
    pub fn is_stochastic(&self) -> bool {
        self.pitch
            .iter()
            .chain(self.duration.iter())
            .all(|m| {
                (0..m.nrows()).all(|r| {
                    let sum = m.row(r).sum();
                    sum.abs() < ROW_SUM_EPSILON || (sum - 1.0).abs() < ROW_SUM_EPSILON
                })
            })
    }

    fn column_sums(m: &DMatrix<f64>) -> Vec<f64> {
        (0..m.ncols()).map(|c| m.column(c).sum()).collect()
    }

    fn normalize(&mut self) {
        for m in self.pitch.iter_mut().chain(self.duration.iter_mut()) {
            for r in 0..m.nrows() {
                let sum = m.row(r).sum();
                if sum > ROW_SUM_EPSILON {
                    for v in m.row_mut(r).iter_mut() {
                        *v /= sum;
                    }
                }
            }
        }
    }
}

/// Estimates [TransitionMatrices] from a recorded note stream.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TransitionMatrixBuilder {
    time_signature: TimeSignature,
}
impl Configurable for TransitionMatrixBuilder {
    fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    fn update_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }
}
impl TransitionMatrixBuilder {
    #[allow(missing_docs)]
    pub fn new_with(time_signature: TimeSignature) -> Self {
        Self { time_signature }
    }

    /// Counts every consecutive pair of notes in `stream` under the metrical
    /// position where the first of the pair started, then normalizes each
    /// row. Positions come from a running beat count that starts at zero with
    /// the first note, so the stream is assumed to begin on a downbeat.
    pub fn build(&self, stream: &[LearnedNote]) -> Result<TransitionMatrices, MarkovError> {
        if stream.len() < 2 {
            return Err(MarkovError::StreamTooShort { len: stream.len() });
        }

        let mut matrices = TransitionMatrices::new_zeroed(self.time_signature.top());
        let mut beat_count = 0.0;
        for pair in stream.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let position = self.time_signature.position_of(beat_count);
            matrices.pitch[position][(current.key_index(), next.key_index())] += 1.0;
            matrices.duration[position][(current.duration.index(), next.duration.index())] +=
                1.0;
            beat_count += current.duration.beats();
        }
        matrices.normalize();

        log::info!(
            "learned {} transitions across {} metrical positions",
            stream.len() - 1,
            matrices.positions()
        );
        Ok(matrices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn notes(pairs: &[(u8, DurationCategory)]) -> Vec<LearnedNote> {
        pairs.iter()
            .map(|(k, d)| LearnedNote::new_with(u7::from(*k), *d))
            .collect()
    }

    #[test]
    fn rejects_short_streams() {
        let b = TransitionMatrixBuilder::default();
        assert_eq!(
            b.build(&[]),
            Err(MarkovError::StreamTooShort { len: 0 })
        );
        assert_eq!(
            b.build(&notes(&[(60, DurationCategory::Quarter)])),
            Err(MarkovError::StreamTooShort { len: 1 })
        );
    }

    #[test]
    fn single_successor_gets_all_the_probability() {
        use DurationCategory::Quarter as Q;
        let b = TransitionMatrixBuilder::new_with(TimeSignature::COMMON_TIME);
        let m = b
            .build(&notes(&[(60, Q), (62, Q), (64, Q), (60, Q)]))
            .unwrap();

        assert_eq!(m.positions(), 4);
        let k = |k: u8| u7::from(k);
        assert!(approx_eq!(f64, m.pitch_probability(0, k(60), k(62)), 1.0));
        assert!(approx_eq!(f64, m.pitch_probability(1, k(62), k(64)), 1.0));
        assert!(approx_eq!(f64, m.pitch_probability(2, k(64), k(60)), 1.0));
        assert!(approx_eq!(f64, m.duration_probability(0, Q, Q), 1.0));

        // Nothing started on beat 3, and 60 never moved anywhere from beat 1.
        assert!(m.pitch_row(3, k(60)).iter().all(|p| *p == 0.0));
        assert!(m.pitch_row(1, k(60)).iter().all(|p| *p == 0.0));
        assert!(is_distribution(&m.pitch_row(0, k(60))));
        assert!(m.is_stochastic());
    }

    #[test]
    fn counts_split_into_fractions() {
        use DurationCategory::{Eighth as E, Half as H, Quarter as Q};
        let b = TransitionMatrixBuilder::new_with(TimeSignature::new_with(2, 4).unwrap());
        // Beats: 0 (60,Q) 1 (62,Q) 2 (60,Q) 3 (64,H) 5 (60,E) 5.5 (62,Q)
        // Positions: 0, 1, 0, 1, 1, 1
        let m = b
            .build(&notes(&[(60, Q), (62, Q), (60, Q), (64, H), (60, E), (62, Q)]))
            .unwrap();
        let k = |k: u8| u7::from(k);

        // At position 0, 60 went to 62 once and to 64 once.
        assert!(approx_eq!(f64, m.pitch_probability(0, k(60), k(62)), 0.5));
        assert!(approx_eq!(f64, m.pitch_probability(0, k(60), k(64)), 0.5));
        // At position 1, 60 went to 62 once.
        assert!(approx_eq!(f64, m.pitch_probability(1, k(60), k(62)), 1.0));
        // Durations at position 1: Q->Q, H->E, E->Q.
        assert!(approx_eq!(f64, m.duration_probability(1, Q, Q), 1.0));
        assert!(approx_eq!(f64, m.duration_probability(1, H, E), 1.0));
        assert!(approx_eq!(f64, m.duration_probability(1, E, Q), 1.0));
        // Durations at position 0: Q->Q, Q->H.
        assert!(approx_eq!(f64, m.duration_probability(0, Q, Q), 0.5));
        assert!(approx_eq!(f64, m.duration_probability(0, Q, H), 0.5));
        assert!(m.is_stochastic());
    }

    #[test]
    fn matrices_follow_the_current_meter() {
        use DurationCategory::Quarter as Q;
        let stream = notes(&[(60, Q), (62, Q), (64, Q)]);
        let mut b = TransitionMatrixBuilder::default();
        assert_eq!(b.build(&stream).unwrap().positions(), 4);
        b.update_time_signature(TimeSignature::new_with(7, 8).unwrap());
        assert_eq!(b.build(&stream).unwrap().positions(), 7);
    }

    #[test]
    fn marginals_sum_destination_weights() {
        use DurationCategory::{Eighth as E, Quarter as Q};
        let b = TransitionMatrixBuilder::new_with(TimeSignature::new_with(1, 4).unwrap());
        // With one position per measure, everything lands at position 0.
        let m = b.build(&notes(&[(60, Q), (62, E), (60, Q), (62, Q)])).unwrap();
        let pm = m.pitch_marginal(0);
        // Rows: 60 -> 62 (prob 1), 62 -> 60 (prob 1).
        assert!(approx_eq!(f64, pm[62], 1.0));
        assert!(approx_eq!(f64, pm[60], 1.0));
        assert!(approx_eq!(f64, pm.iter().sum::<f64>(), 2.0));
        let dm = m.duration_marginal(0);
        assert!(dm[DurationCategory::NoiseThreshold.index()] == 0.0);
        assert!(dm[E.index()] > 0.0 && dm[Q.index()] > 0.0);
    }
}
