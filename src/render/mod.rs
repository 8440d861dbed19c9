//! Track Renderer
//!
//! Mixes scheduled clicks into a take-sized buffer and encodes the result.
//!
//! Pipeline:
//! 1. [`mix_events`] sums each click into a zeroed `f32` buffer, clipping
//!    clicks that run past the end of the take
//! 2. [`quantize`] clamps to [-1, 1] and scales to signed 16-bit
//! 3. [`wav::encode_wav`] wraps the samples in a mono PCM WAV container
//!
//! Every stage is deterministic: identical input gives identical bytes.

pub mod wav;

pub use wav::{encode_wav, wav_spec, WAV_HEADER_LEN};

use crate::click::ClickBank;
use crate::scheduler::{self, ClickEvent, TakeSpec};
use crate::{CadenceError, Result, SAMPLE_RATE};

/// Full-scale value used when converting to 16-bit PCM
const PCM_SCALE: f32 = i16::MAX as f32;

/// Additively mix clicks into a zero-filled buffer of `total_samples`.
///
/// Each click is written for at most `total_samples - sample_offset`
/// samples, so nothing is ever written past the end of the buffer. Events
/// starting outside the buffer are skipped.
pub fn mix_events(events: &[ClickEvent], total_samples: usize, bank: &ClickBank) -> Vec<f32> {
    let mut buffer = vec![0.0f32; total_samples];

    for event in events {
        let click = bank.waveform(event.kind);
        if click.is_empty() || event.sample_offset >= total_samples {
            continue;
        }

        let len = click.len().min(total_samples - event.sample_offset);
        let dest = &mut buffer[event.sample_offset..event.sample_offset + len];
        for (out, &sample) in dest.iter_mut().zip(&click[..len]) {
            *out += sample;
        }
    }

    buffer
}

/// Convert mixed samples to 16-bit PCM: `round(clamp(s, -1, 1) * 32767)`.
///
/// Overlapping clicks can sum past full scale; they saturate here instead of
/// wrapping around.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            let s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
            (s * PCM_SCALE).round() as i16
        })
        .collect()
}

/// Render scheduled events into an encoded WAV asset.
///
/// # Errors
/// - [`CadenceError::InvalidParameter`] if `total_samples` or `sample_rate`
///   is zero
/// - [`CadenceError::EncodingFailure`] if the container cannot be written
pub fn render(events: &[ClickEvent], total_samples: usize, sample_rate: u32) -> Result<Vec<u8>> {
    if total_samples == 0 {
        return Err(CadenceError::InvalidParameter(
            "total sample count must be positive".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(CadenceError::InvalidParameter(
            "sample rate must be positive".to_string(),
        ));
    }

    let bank = ClickBank::new(sample_rate)?;
    let mixed = mix_events(events, total_samples, &bank);
    let pcm = quantize(&mixed);

    let clipped = mixed.iter().filter(|s| s.abs() > 1.0).count();
    if clipped > 0 {
        log::warn!("{clipped} samples exceeded full scale and were clamped");
    }

    encode_wav(&pcm, sample_rate)
}

/// Schedule and render a take at 44.1 kHz.
///
/// # Examples
/// ```
/// use rap_cadence::{render_take, TakeSpec, TempoSpec};
/// let take = TakeSpec::new(TempoSpec::new(120, 4), 2.0, false);
/// let wav = render_take(&take).unwrap();
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(wav.len(), 44 + 88_200 * 2);
/// ```
pub fn render_take(take: &TakeSpec) -> Result<Vec<u8>> {
    let events = scheduler::schedule(take)?;
    let total_samples = take.total_samples(SAMPLE_RATE);
    let bytes = render(&events, total_samples, SAMPLE_RATE)?;

    log::info!(
        "rendered {:.1}s take at {} bpm ({} clicks, ghost={}, {} bytes)",
        take.duration_seconds,
        take.tempo.bpm,
        events.iter().filter(|e| e.kind.is_audible()).count(),
        take.ghost_mode,
        bytes.len()
    );

    Ok(bytes)
}
