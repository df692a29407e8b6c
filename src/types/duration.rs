// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter, FromRepr};

/// The canonical note lengths that learning and generation work with, in
/// quarter-note beats. Variants are ordered by length, and the order matters:
/// the discriminant is the row/column index in a duration transition matrix,
/// and quantization ties resolve toward the earlier variant.
///
/// The shortest category isn't a musical value. Anything that quantizes to it
/// is treated as a glitch (contact bounce, a double-triggered key) and never
/// becomes part of a model.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    FromRepr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DurationCategory {
    /// 0.1 beat. Noise.
    NoiseThreshold,
    /// 1/8 beat
    ThirtySecond,
    /// 1/4 beat
    Sixteenth,
    /// ~1/3 beat
    EighthTriplet,
    /// 1/2 beat
    Eighth,
    /// 1 beat
    Quarter,
    /// 1.5 beats
    DottedQuarter,
    /// 2 beats
    Half,
    /// 2.5 beats
    HalfTiedEighth,
    /// 3 beats
    DottedHalf,
    /// 3.5 beats
    DoubleDottedHalf,
    /// 4 beats
    Whole,
}
impl DurationCategory {
    /// Number of categories, which is also the dimension of a duration
    /// transition matrix.
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    /// The length of this category in beats.
    pub const fn beats(&self) -> f64 {
        match self {
            Self::NoiseThreshold => 0.1,
            Self::ThirtySecond => 0.125,
            Self::Sixteenth => 0.25,
            Self::EighthTriplet => 0.334,
            Self::Eighth => 0.5,
            Self::Quarter => 1.0,
            Self::DottedQuarter => 1.5,
            Self::Half => 2.0,
            Self::HalfTiedEighth => 2.5,
            Self::DottedHalf => 3.0,
            Self::DoubleDottedHalf => 3.5,
            Self::Whole => 4.0,
        }
    }

    /// The matrix index of this category.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The inverse of [DurationCategory::index()].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Whether this category marks a too-short, ignorable event.
    pub const fn is_noise(&self) -> bool {
        matches!(self, Self::NoiseThreshold)
    }

    /// Returns the category closest to the given length in beats. When two
    /// categories are equally close, the shorter one wins.
    pub fn nearest(beats: f64) -> Self {
        let mut best = Self::NoiseThreshold;
        let mut best_distance = f64::INFINITY;
        for category in Self::iter() {
            let distance = (category.beats() - beats).abs();
            if distance < best_distance {
                best = category;
                best_distance = distance;
            }
        }
        best
    }
}
