// Copyright (c) 2024 Mike Tsao

//! Learns first-order, metrically indexed transition probabilities from a
//! live performance and improvises new melodies from them.
//!
//! The pieces, in the order data flows through them:
//!
//! * [EventStreamRecorder] pairs onsets with offsets using a
//! [PolyphonyTracker] and a [DurationQuantizer], producing [LearnedNote]s.
//! * [TransitionMatrixBuilder] counts consecutive pairs of [LearnedNote]s
//! into [TransitionMatrices].
//! * [MelodyGenerator] walks [TransitionMatrices] to produce
//! [MelodyEvent]s.
//! * [MarkovSession] ties them together behind the MIDI control protocol
//! described by [ControlCommand].

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ControlCommand, EventStreamRecorder, MarkovSession, MelodyGenerator, SessionMode,
        TransitionMatrices, TransitionMatrixBuilder,
    };
}

pub use generator::MelodyGenerator;
pub use matrix::{
    is_distribution, TransitionMatrices, TransitionMatrixBuilder, KEY_COUNT, ROW_SUM_EPSILON,
};
pub use quantizer::DurationQuantizer;
pub use recorder::{EventStreamRecorder, PolyphonyTracker};
pub use session::{ControlCommand, MarkovSession, SessionMode};

mod generator;
mod matrix;
mod quantizer;
mod recorder;
mod session;
