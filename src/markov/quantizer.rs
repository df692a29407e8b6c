// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;

/// Turns elapsed wall-clock time into a [DurationCategory] at the current
/// tempo.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DurationQuantizer {
    tempo: Tempo,
}
impl Configurable for DurationQuantizer {
    fn tempo(&self) -> Tempo {
        self.tempo
    }

    fn update_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }
}
impl DurationQuantizer {
    #[allow(missing_docs)]
    pub fn new_with(tempo: Tempo) -> Self {
        Self { tempo }
    }

    /// Returns the category nearest to `elapsed`, measured in beats.
    pub fn quantize(&self, elapsed: Seconds) -> DurationCategory {
        DurationCategory::nearest(self.tempo.beats_in(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn quantizes_at_tempo() {
        let q = DurationQuantizer::new_with(Tempo(60.0));
        assert_eq!(q.quantize(Seconds(1.0)), DurationCategory::Quarter);
        assert_eq!(q.quantize(Seconds(0.52)), DurationCategory::Eighth);
        assert_eq!(q.quantize(Seconds(0.02)), DurationCategory::NoiseThreshold);

        let q = DurationQuantizer::new_with(Tempo(120.0));
        assert_eq!(q.quantize(Seconds(1.0)), DurationCategory::Half);
        assert_eq!(q.quantize(Seconds(2.0)), DurationCategory::Whole);
    }

    #[test]
    fn quantizing_a_category_returns_it() {
        for tempo in [60.0, 97.0, 200.0] {
            let tempo = Tempo(tempo);
            let q = DurationQuantizer::new_with(tempo);
            for category in DurationCategory::iter() {
                assert_eq!(q.quantize(tempo.seconds_for(category.beats())), category);
            }
        }
    }

    #[test]
    fn follows_tempo_changes() {
        let mut q = DurationQuantizer::default();
        assert_eq!(q.quantize(Seconds(1.0)), DurationCategory::Quarter);
        q.update_tempo(Tempo(180.0));
        assert_eq!(q.tempo(), Tempo(180.0));
        assert_eq!(q.quantize(Seconds(1.0)), DurationCategory::DottedHalf);
    }
}
