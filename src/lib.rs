// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Ensnare Markov listens to a live MIDI performance and answers it.
//!
//! A performer sends control-change messages to start and stop learning.
//! While learning, every note played is quantized into a
//! [DurationCategory](types::DurationCategory) at the current tempo and
//! recorded. On request, the recording becomes a set of first-order
//! transition matrices, one per beat of the current meter, and a new melody
//! is sampled from them.
//!
//! * *Easiest*: Feed every incoming message to a [MarkovSession], and play
//! what it hands back with something that
//! [PlaysMelodies](traits::PlaysMelodies).
//! * *More control*: Use [EventStreamRecorder](markov::EventStreamRecorder),
//! [TransitionMatrixBuilder](markov::TransitionMatrixBuilder), and
//! [MelodyGenerator](markov::MelodyGenerator) directly.

/// A collection of imports that are useful to users of this crate. `use
/// ensnare_markov::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        error::MarkovError, markov::prelude::*, traits::prelude::*, types::prelude::*,
        util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
#[cfg(feature = "std")]
pub use version::app_version;
pub use {error::MarkovError, markov::MarkovSession};

pub mod error;
pub mod markov;
pub mod traits;
pub mod types;
pub mod util;

#[cfg(feature = "std")]
mod version;
