// Copyright (c) 2024 Mike Tsao

//! Handles wall-clock and musical time.

use crate::error::MarkovError;
use core::{
    fmt::{self, Display},
    ops::{Add, Sub},
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Beats per minute.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct Tempo(#[derivative(Default(value = "60.0"))] pub f64);
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.0))
    }
}
impl From<u16> for Tempo {
    fn from(value: u16) -> Self {
        Self(value as f64)
    }
}
impl From<u8> for Tempo {
    fn from(value: u8) -> Self {
        Self(value as f64)
    }
}
impl Tempo {
    /// The largest value the control protocol can express (127 + 128).
    pub const MAX_VALUE: f64 = 255.0;

    /// The smallest nonzero value the control protocol can express.
    pub const MIN_VALUE: f64 = 1.0;

    /// Converts elapsed wall-clock time into a (fractional) count of beats.
    pub fn beats_in(&self, seconds: Seconds) -> f64 {
        self.0 * seconds.0 / 60.0
    }

    /// Converts a (fractional) count of beats into wall-clock time.
    pub fn seconds_for(&self, beats: f64) -> Seconds {
        Seconds(beats * 60.0 / self.0)
    }

    /// MIN..=MAX
    pub const fn range() -> core::ops::RangeInclusive<f64> {
        Self::MIN_VALUE..=Self::MAX_VALUE
    }
}

/// [TimeSignature] represents a music [time
/// signature](https://en.wikipedia.org/wiki/Time_signature).
///
/// The top number of a time signature tells how many beats are in a measure,
/// and it is the number of metrical positions a learned model distinguishes.
/// The bottom number tells the value of a beat. It's carried along for
/// display, but learning always counts quarter-note beats.
///
/// Both numbers are at least 1. [TimeSignature::new_with] and deserialization
/// both enforce that.
#[derive(Clone, Copy, Debug, Derivative, Eq, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", try_from = "RawTimeSignature")]
pub struct TimeSignature {
    /// The number of beats in a measure.
    #[derivative(Default(value = "4"))]
    top: usize,

    /// The value of a beat. Expressed as a reciprocal; for example, if it's 4,
    /// then the beat value is 1/4 or a quarter note.
    #[derivative(Default(value = "4"))]
    bottom: usize,
}
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawTimeSignature {
    top: usize,
    bottom: usize,
}
impl TryFrom<RawTimeSignature> for TimeSignature {
    type Error = MarkovError;

    fn try_from(value: RawTimeSignature) -> Result<Self, Self::Error> {
        Self::new_with(value.top, value.bottom)
    }
}
impl Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.top, self.bottom))
    }
}
#[allow(missing_docs)]
impl TimeSignature {
    /// 4/4, the default meter.
    pub const COMMON_TIME: Self = TimeSignature { top: 4, bottom: 4 };

    pub fn new_with(top: usize, bottom: usize) -> Result<Self, MarkovError> {
        if top == 0 || bottom == 0 {
            Err(MarkovError::InvalidTimeSignature { top, bottom })
        } else {
            Ok(Self { top, bottom })
        }
    }

    /// Beats per measure, which is also the number of metrical positions.
    pub fn top(&self) -> usize {
        self.top
    }

    /// The reciprocal of the beat value.
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// Returns the metrical position (zero-based beat within the measure) of
    /// the given running beat count.
    pub fn position_of(&self, beat_count: f64) -> usize {
        (beat_count.trunc() as usize) % self.top
    }
}
impl core::str::FromStr for TimeSignature {
    type Err = MarkovError;

    /// Parses "3/4"-style strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (top, bottom) = s
            .split_once('/')
            .ok_or_else(|| MarkovError::UnparseableTimeSignature(s.to_string()))?;
        let top = top
            .trim()
            .parse()
            .map_err(|_| MarkovError::UnparseableTimeSignature(s.to_string()))?;
        let bottom = bottom
            .trim()
            .parse()
            .map_err(|_| MarkovError::UnparseableTimeSignature(s.to_string()))?;
        Self::new_with(top, bottom)
    }
}

/// Wall-clock time in seconds. Used both for timestamps, which only mean
/// something relative to one another, and for elapsed intervals.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }

    /// Builds a [Seconds] from a microsecond count, the unit that most MIDI
    /// drivers timestamp their input with.
    pub fn from_micros(micros: u64) -> Seconds {
        Seconds(micros as f64 / 1_000_000.0)
    }
}
impl From<Seconds> for std::time::Duration {
    fn from(value: Seconds) -> Self {
        std::time::Duration::try_from_secs_f64(value.0.max(0.0))
            .unwrap_or(std::time::Duration::MAX)
    }
}
impl Add<Seconds> for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Seconds) -> Self::Output {
        Seconds(self.0 + rhs.0)
    }
}
impl Sub<Seconds> for Seconds {
    type Output = Seconds;

    fn sub(self, rhs: Seconds) -> Self::Output {
        Seconds(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn tempo_conversions() {
        let t = Tempo(120.0);
        assert!(approx_eq!(f64, t.beats_in(Seconds(1.5)), 3.0));
        assert!(approx_eq!(f64, t.seconds_for(3.0).0, 1.5));
        assert_eq!(Tempo::default(), Tempo(60.0));
    }

    #[test]
    fn valid_time_signatures() {
        assert!(TimeSignature::new_with(3, 4).is_ok());
        assert!(TimeSignature::new_with(7, 3).is_ok());
        assert!(matches!(
            TimeSignature::new_with(0, 4),
            Err(MarkovError::InvalidTimeSignature { top: 0, bottom: 4 })
        ));
        assert_eq!(TimeSignature::default(), TimeSignature::COMMON_TIME);
    }

    #[test]
    fn time_signature_parses() {
        assert_eq!(
            "3/4".parse::<TimeSignature>().unwrap(),
            TimeSignature { top: 3, bottom: 4 }
        );
        assert_eq!(
            " 6 / 8 ".parse::<TimeSignature>().unwrap(),
            TimeSignature { top: 6, bottom: 8 }
        );
        assert!("waltz".parse::<TimeSignature>().is_err());
        assert!("0/4".parse::<TimeSignature>().is_err());
    }

    #[test]
    fn metrical_positions() {
        let ts = TimeSignature::new_with(3, 4).unwrap();
        assert_eq!(ts.position_of(0.0), 0);
        assert_eq!(ts.position_of(0.99), 0);
        assert_eq!(ts.position_of(2.5), 2);
        assert_eq!(ts.position_of(3.0), 0);
        assert_eq!(ts.position_of(7.25), 1);
    }

    #[test]
    fn seconds_arithmetic() {
        let elapsed = Seconds(2.25) - Seconds(1.0);
        assert!(approx_eq!(f64, elapsed.0, 1.25));
        assert!(approx_eq!(f64, Seconds::from_micros(1_500_000).0, 1.5));
        let d: std::time::Duration = Seconds(0.5).into();
        assert_eq!(d.as_millis(), 500);

        let forever: std::time::Duration = Seconds(f64::INFINITY).into();
        assert_eq!(forever, std::time::Duration::MAX);
        let never: std::time::Duration = Seconds(-1.0).into();
        assert_eq!(never, std::time::Duration::ZERO);
    }

    #[test]
    fn deserialized_time_signatures_are_checked() {
        let ts: TimeSignature = serde_json::from_str(r#"{"top":3,"bottom":4}"#).unwrap();
        assert_eq!(ts, TimeSignature::new_with(3, 4).unwrap());
        assert!(serde_json::from_str::<TimeSignature>(r#"{"top":0,"bottom":4}"#).is_err());
        assert!(serde_json::from_str::<TimeSignature>(r#"{"top":4,"bottom":0}"#).is_err());
    }
}
