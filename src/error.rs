// Copyright (c) 2024 Mike Tsao

//! Errors produced while learning and generating.

use thiserror::Error;

/// Everything that can go wrong in this crate. Malformed note streams and
/// unobserved transitions are absorbed, not reported.
#[derive(Debug, Error, PartialEq)]
pub enum MarkovError {
    /// Transitions need at least one pair of notes.
    #[error("can't learn transitions from {len} note(s); at least 2 are required")]
    StreamTooShort {
        #[allow(missing_docs)]
        len: usize,
    },

    /// Generation needs at least one observed transition to start from.
    #[error("the model has no observed transitions to sample from")]
    EmptyDistribution,

    /// Generation was asked for nothing.
    #[error("at least one measure must be requested")]
    InvalidMeasures,

    /// A time signature with a zero in it.
    #[error("time signature {top}/{bottom} is invalid")]
    InvalidTimeSignature {
        #[allow(missing_docs)]
        top: usize,
        #[allow(missing_docs)]
        bottom: usize,
    },

    /// A time signature string that isn't of the form "3/4".
    #[error("couldn't parse \"{0}\" as a time signature")]
    UnparseableTimeSignature(String),

    /// A raw value outside 0..=127 arrived where a MIDI key was expected.
    #[error("{0} is not a valid MIDI key")]
    InvalidKey(u8),
}
