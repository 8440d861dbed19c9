//! Click Synthesizer
//!
//! Generates the short tone bursts that make up a click track. A click is a
//! plain sine wave at amplitude 0.5 starting at phase 0, with no envelope.
//!
//! Two presets are used by the renderer:
//! - Accent (first beat of a bar): 1200 Hz for 50 ms
//! - Normal (every other beat): 800 Hz for 50 ms

use crate::scheduler::ClickKind;
use crate::{CadenceError, Result};
use std::f64::consts::PI;

/// Peak amplitude of a synthesized click
pub const CLICK_AMPLITUDE: f32 = 0.5;

/// Frequency/duration pair describing one click timbre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPreset {
    /// Tone frequency in Hz
    pub frequency_hz: f64,
    /// Burst length in seconds
    pub duration_seconds: f64,
}

impl ClickPreset {
    /// Downbeat click (1200 Hz, 50 ms)
    pub const ACCENT: ClickPreset = ClickPreset {
        frequency_hz: 1200.0,
        duration_seconds: 0.05,
    };

    /// Off-beat click (800 Hz, 50 ms)
    pub const NORMAL: ClickPreset = ClickPreset {
        frequency_hz: 800.0,
        duration_seconds: 0.05,
    };

    /// Preset for a scheduled click kind, `None` for silent beats
    pub fn for_kind(kind: ClickKind) -> Option<ClickPreset> {
        match kind {
            ClickKind::Accent => Some(Self::ACCENT),
            ClickKind::Normal => Some(Self::NORMAL),
            ClickKind::Silent => None,
        }
    }

    /// Render this preset at the given sample rate
    pub fn synthesize(&self, sample_rate: u32) -> Result<Vec<f32>> {
        synthesize(self.frequency_hz, self.duration_seconds, sample_rate)
    }

    /// Number of samples this preset occupies at the given sample rate
    pub fn len_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.duration_seconds).round() as usize
    }
}

/// Synthesize a sine burst.
///
/// Produces `round(sample_rate * duration_seconds)` samples where
/// `sample[i] = 0.5 * sin(2π * frequency_hz * i / sample_rate)`.
///
/// # Errors
/// Returns [`CadenceError::InvalidParameter`] when the frequency or duration
/// is not a positive finite number, or when the sample rate is zero.
///
/// # Examples
/// ```
/// use rap_cadence::synthesize;
/// let click = synthesize(800.0, 0.05, 44_100).unwrap();
/// assert_eq!(click.len(), 2205);
/// assert_eq!(click[0], 0.0);
/// ```
pub fn synthesize(frequency_hz: f64, duration_seconds: f64, sample_rate: u32) -> Result<Vec<f32>> {
    if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
        return Err(CadenceError::InvalidParameter(format!(
            "click frequency must be positive, got {frequency_hz}"
        )));
    }
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
        return Err(CadenceError::InvalidParameter(format!(
            "click duration must be positive, got {duration_seconds}"
        )));
    }
    if sample_rate == 0 {
        return Err(CadenceError::InvalidParameter(
            "sample rate must be positive".to_string(),
        ));
    }

    let len = (sample_rate as f64 * duration_seconds).round() as usize;
    let phase_step = 2.0 * PI * frequency_hz / sample_rate as f64;

    Ok((0..len)
        .map(|i| CLICK_AMPLITUDE * (phase_step * i as f64).sin() as f32)
        .collect())
}

/// Pre-rendered accent and normal clicks for one sample rate.
///
/// Built once per render call so that every beat reuses the same waveform.
#[derive(Debug, Clone)]
pub struct ClickBank {
    accent: Vec<f32>,
    normal: Vec<f32>,
}

impl ClickBank {
    /// Render both presets at `sample_rate`
    pub fn new(sample_rate: u32) -> Result<Self> {
        Ok(ClickBank {
            accent: ClickPreset::ACCENT.synthesize(sample_rate)?,
            normal: ClickPreset::NORMAL.synthesize(sample_rate)?,
        })
    }

    /// Waveform for a click kind (empty for silent beats)
    pub fn waveform(&self, kind: ClickKind) -> &[f32] {
        match kind {
            ClickKind::Accent => &self.accent,
            ClickKind::Normal => &self.normal,
            ClickKind::Silent => &[],
        }
    }

    /// Length of the longest click in samples
    pub fn max_len(&self) -> usize {
        self.accent.len().max(self.normal.len())
    }
}
