//! Tempo and take parameters
//!
//! A [`TakeSpec`] fully determines a rendered click track: the same take
//! always produces the same bytes.

use crate::{CadenceError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Beats per bar used when none is given
pub const DEFAULT_SUBDIVISION: u32 = 4;

/// Tempo range offered to a practising user
pub const PRACTICAL_BPM: RangeInclusive<u32> = 60..=160;

/// Take length range offered to a practising user (seconds)
pub const PRACTICAL_DURATION_SECONDS: RangeInclusive<f64> = 10.0..=300.0;

/// Longest take the renderer accepts (one hour)
pub const MAX_DURATION_SECONDS: f64 = 3600.0;

/// Tempo and bar size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoSpec {
    /// Beats per minute
    pub bpm: u32,
    /// Beats per bar
    pub subdivision: u32,
}

impl TempoSpec {
    /// Create a tempo; validation happens when the take is scheduled
    pub fn new(bpm: u32, subdivision: u32) -> Self {
        TempoSpec { bpm, subdivision }
    }

    /// Tempo in 4 beats per bar
    pub fn common_time(bpm: u32) -> Self {
        Self::new(bpm, DEFAULT_SUBDIVISION)
    }

    /// Whole samples between two beats: `floor(sample_rate * 60 / bpm)`.
    ///
    /// Computed in integer arithmetic so the spacing is exact for every
    /// tempo. Returns 0 for a zero bpm.
    pub fn samples_per_beat(&self, sample_rate: u32) -> usize {
        if self.bpm == 0 {
            return 0;
        }
        (sample_rate as u64 * 60 / self.bpm as u64) as usize
    }

    /// Syllables (sub-beats) per second, see [`derive_rate`]
    pub fn rate(&self) -> f64 {
        derive_rate(self.bpm, self.subdivision)
    }

    /// Check that the tempo can be scheduled at `sample_rate`
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if self.bpm == 0 {
            return Err(CadenceError::InvalidParameter(
                "bpm must be positive".to_string(),
            ));
        }
        if self.subdivision == 0 {
            return Err(CadenceError::InvalidParameter(
                "subdivision must be positive".to_string(),
            ));
        }
        if self.samples_per_beat(sample_rate) == 0 {
            return Err(CadenceError::InvalidParameter(format!(
                "bpm {} is too fast for {} Hz (less than one sample per beat)",
                self.bpm, sample_rate
            )));
        }
        Ok(())
    }
}

impl Default for TempoSpec {
    fn default() -> Self {
        Self::common_time(120)
    }
}

/// Everything needed to render one practice take
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeSpec {
    /// Tempo and bar size
    pub tempo: TempoSpec,
    /// Length of the take in seconds
    pub duration_seconds: f64,
    /// Mute every fourth bar
    pub ghost_mode: bool,
}

impl TakeSpec {
    /// Create a take
    pub fn new(tempo: TempoSpec, duration_seconds: f64, ghost_mode: bool) -> Self {
        TakeSpec {
            tempo,
            duration_seconds,
            ghost_mode,
        }
    }

    /// Same take with a different tempo
    pub fn with_tempo(self, tempo: TempoSpec) -> Self {
        TakeSpec { tempo, ..self }
    }

    /// Buffer length: `round(sample_rate * duration_seconds)`
    pub fn total_samples(&self, sample_rate: u32) -> usize {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return 0;
        }
        (sample_rate as f64 * self.duration_seconds).round() as usize
    }

    /// Check tempo and duration before anything is allocated
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(CadenceError::InvalidParameter(
                "sample rate must be positive".to_string(),
            ));
        }
        self.tempo.validate(sample_rate)?;

        let duration = self.duration_seconds;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CadenceError::InvalidParameter(format!(
                "duration must be positive, got {duration}"
            )));
        }
        if duration > MAX_DURATION_SECONDS {
            return Err(CadenceError::InvalidParameter(format!(
                "duration {duration}s exceeds the {MAX_DURATION_SECONDS}s limit"
            )));
        }
        if self.total_samples(sample_rate) == 0 {
            return Err(CadenceError::InvalidParameter(format!(
                "duration {duration}s is shorter than one sample"
            )));
        }
        Ok(())
    }
}

/// Derived speaking rate: `bpm * subdivision / 60`.
///
/// Informational only; rendering never reads it.
///
/// ```
/// use rap_cadence::derive_rate;
/// assert_eq!(derive_rate(60, 4), 4.0);
/// ```
pub fn derive_rate(bpm: u32, subdivision: u32) -> f64 {
    bpm as f64 * subdivision as f64 / 60.0
}
