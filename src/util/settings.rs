// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about a learning session.
//! Intended to be serialized.

use crate::types::{u7, Tempo, TimeSignature};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// The starting conditions of a [MarkovSession](crate::markov::MarkovSession).
/// Tempo and meter can change afterward through the control protocol;
/// velocity and seed can't.
///
/// Deserialization goes through [SessionSettingsBuilder], so settings read
/// from a file are checked the same way as built ones, and missing fields
/// take their defaults.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(
    default,
    derive(Deserialize),
    build_fn(validate = "Self::validate")
)]
#[builder_struct_attr(serde(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case", try_from = "SessionSettingsBuilder")]
pub struct SessionSettings {
    /// Initial tempo.
    tempo: Tempo,

    /// Initial meter.
    time_signature: TimeSignature,

    /// Note-on velocity of generated notes.
    #[derivative(Default(value = "100"))]
    velocity: u8,

    /// Seeds the generator's PRNG. None means seed from the OS.
    #[builder(setter(strip_option))]
    seed: Option<u128>,
}
impl TryFrom<SessionSettingsBuilder> for SessionSettings {
    type Error = SessionSettingsBuilderError;

    fn try_from(builder: SessionSettingsBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
impl SessionSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(velocity) = self.velocity {
            if velocity > 127 {
                return Err(format!("velocity {velocity} is out of range 0..=127"));
            }
        }
        if let Some(tempo) = self.tempo {
            if !Tempo::range().contains(&tempo.0) {
                return Err(format!("tempo {tempo} is out of range"));
            }
        }
        Ok(())
    }
}
#[allow(missing_docs)]
impl SessionSettings {
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn velocity(&self) -> u7 {
        u7::from(self.velocity)
    }

    pub fn seed(&self) -> Option<u128> {
        self.seed
    }
}
