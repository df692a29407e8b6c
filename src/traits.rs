// Copyright (c) 2024 Mike Tsao

//! The seams between the learning engine and the outside world.

use crate::prelude::*;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{Configurable, Configurables, HandlesMidi, MelodyEventsFn, PlaysMelodies};
}

/// Tempo and meter, bundled so that an owner of several [Configurable]s can
/// keep its own copy and delegate to it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Configurables {
    tempo: Tempo,
    time_signature: TimeSignature,
}
impl Configurables {
    #[allow(missing_docs)]
    pub fn new_with(tempo: Tempo, time_signature: TimeSignature) -> Self {
        Self {
            tempo,
            time_signature,
        }
    }
}
impl Configurable for Configurables {
    fn tempo(&self) -> Tempo {
        self.tempo
    }

    fn update_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo
    }

    fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    fn update_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature
    }
}

/// Anything whose behavior depends on the session's tempo or meter. Tempo
/// changes take effect immediately, for example on how the next offset is
/// quantized. Meter changes only affect what gets built afterward.
pub trait Configurable {
    /// The current tempo.
    fn tempo(&self) -> Tempo {
        unimplemented!("tempo() isn't tracked here")
    }

    /// The session's tempo changed.
    #[allow(unused_variables)]
    fn update_tempo(&mut self, tempo: Tempo) {}

    /// The current meter.
    fn time_signature(&self) -> TimeSignature {
        unimplemented!("time_signature() isn't tracked here")
    }

    /// The session's meter changed.
    #[allow(unused_variables)]
    fn update_time_signature(&mut self, time_signature: TimeSignature) {}

    /// Forget everything learned or recorded so far.
    fn reset(&mut self) {}
}

/// Receives [MelodyEvent]s produced in response to incoming MIDI.
pub type MelodyEventsFn<'a> = dyn FnMut(MelodyEvent) + 'a;

/// Takes timestamped MIDI messages from the outside world.
pub trait HandlesMidi {
    /// Handles one message. `when` is the message's arrival time on any
    /// monotonic clock; only differences between timestamps matter. Anything
    /// generated in response is handed to `melody_events_fn` in playing
    /// order before this method returns.
    #[allow(unused_variables)]
    fn handle_midi_message(
        &mut self,
        when: Seconds,
        channel: MidiChannel,
        message: MidiMessage,
        melody_events_fn: &mut MelodyEventsFn,
    ) {
    }
}

/// Something that performs generated melodies, for example by sending them
/// to a MIDI output port.
///
/// The pacing contract: after an onset, the player holds for
/// [MelodyEvent::hold_time()] before accepting the next event. Offsets don't
/// hold.
pub trait PlaysMelodies {
    /// Performs a single event. Implementations may block for the event's
    /// hold time.
    fn play(&mut self, event: &MelodyEvent, tempo: Tempo);

    /// Performs a whole sequence in order.
    fn play_all(&mut self, events: &[MelodyEvent], tempo: Tempo) {
        for event in events {
            self.play(event, tempo);
        }
    }
}
