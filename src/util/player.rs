// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;

/// A [PlaysMelodies] that performs nothing and waits for nothing. It keeps
/// what it was given, and tallies how long a real player would have taken.
#[derive(Debug, Default)]
pub struct CollectingPlayer {
    events: Vec<MelodyEvent>,
    elapsed: Seconds,
}
impl PlaysMelodies for CollectingPlayer {
    fn play(&mut self, event: &MelodyEvent, tempo: Tempo) {
        self.events.push(*event);
        self.elapsed = self.elapsed + event.hold_time(tempo);
    }
}
impl CollectingPlayer {
    /// Everything played so far, in order.
    pub fn events(&self) -> &[MelodyEvent] {
        &self.events
    }

    /// The wall-clock time a paced player would have spent.
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    /// Forgets everything played so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.elapsed = Seconds::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::u7;
    use float_cmp::approx_eq;

    #[test]
    fn tallies_hold_time() {
        let mut player = CollectingPlayer::default();
        let melody = [
            MelodyEvent::NoteOn {
                key: u7::from(60),
                vel: u7::from(100),
                duration: DurationCategory::Quarter,
            },
            MelodyEvent::NoteOff { key: u7::from(60) },
            MelodyEvent::NoteOn {
                key: u7::from(62),
                vel: u7::from(100),
                duration: DurationCategory::Half,
            },
            MelodyEvent::NoteOff { key: u7::from(62) },
        ];
        player.play_all(&melody, Tempo(120.0));
        assert_eq!(player.events().len(), 4);
        assert!(approx_eq!(f64, player.elapsed().0, 1.5));

        player.clear();
        assert!(player.events().is_empty());
    }
}
