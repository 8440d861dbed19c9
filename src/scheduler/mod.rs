//! Beat Scheduler
//!
//! Turns a [`TakeSpec`] into the ordered list of clicks for a whole take.
//!
//! Policies:
//! - The first beat of every bar is an accent, all others are normal clicks
//! - With Ghost Mode on, every fourth bar (bars 4, 8, 12, ...) is muted:
//!   its beats are emitted as [`ClickKind::Silent`] and time keeps running
//! - A click is scheduled for every beat that starts inside the take, even if
//!   its tail runs past the end; the renderer clips the overflow

pub mod tempo;

pub use tempo::{
    derive_rate, TakeSpec, TempoSpec, DEFAULT_SUBDIVISION, MAX_DURATION_SECONDS, PRACTICAL_BPM,
    PRACTICAL_DURATION_SECONDS,
};

use crate::{Result, SAMPLE_RATE};
use serde::Serialize;

/// Bars per Ghost Mode cycle; the last bar of each cycle is muted
pub const GHOST_BAR_INTERVAL: u32 = 4;

/// Sound of one scheduled beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClickKind {
    /// Downbeat (high click)
    Accent,
    /// Any other beat (low click)
    Normal,
    /// Beat inside a ghost bar, renders nothing
    Silent,
}

impl ClickKind {
    /// True for clicks that produce sound
    pub fn is_audible(&self) -> bool {
        !matches!(self, ClickKind::Silent)
    }
}

/// One beat of a take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClickEvent {
    /// First sample of the click in the take buffer
    pub sample_offset: usize,
    /// What to play
    pub kind: ClickKind,
    /// Beat index from the start of the take (0-based)
    pub beat: u32,
    /// Bar number (1-based)
    pub bar: u32,
}

/// True when `bar` is muted under Ghost Mode
pub fn is_ghost_bar(bar: u32) -> bool {
    bar % GHOST_BAR_INTERVAL == 0
}

/// Schedule a take at the crate sample rate.
///
/// # Errors
/// [`crate::CadenceError::InvalidParameter`] for a zero bpm or subdivision,
/// a non-positive duration, or a tempo faster than one beat per sample.
///
/// # Examples
/// ```
/// use rap_cadence::{schedule, ClickKind, TakeSpec, TempoSpec};
/// let events = schedule(&TakeSpec::new(TempoSpec::new(120, 4), 2.0, false)).unwrap();
/// let offsets: Vec<usize> = events.iter().map(|e| e.sample_offset).collect();
/// assert_eq!(offsets, vec![0, 22_050, 44_100, 66_150]);
/// assert_eq!(events[0].kind, ClickKind::Accent);
/// ```
pub fn schedule(take: &TakeSpec) -> Result<Vec<ClickEvent>> {
    schedule_at(take, SAMPLE_RATE)
}

/// Schedule `take` played at `tempo` (the tempo given here wins over the
/// one stored in the take).
pub fn schedule_beats(tempo: &TempoSpec, take: &TakeSpec) -> Result<Vec<ClickEvent>> {
    schedule(&take.with_tempo(*tempo))
}

/// Schedule a take at an arbitrary sample rate
pub fn schedule_at(take: &TakeSpec, sample_rate: u32) -> Result<Vec<ClickEvent>> {
    take.validate(sample_rate)?;

    let total_samples = take.total_samples(sample_rate);
    let samples_per_beat = take.tempo.samples_per_beat(sample_rate);
    let subdivision = take.tempo.subdivision;

    let mut events = Vec::with_capacity(total_samples / samples_per_beat + 1);
    let mut current_sample = 0usize;
    let mut beat = 0u32;
    let mut bar = 1u32;

    while current_sample < total_samples {
        if beat > 0 && beat % subdivision == 0 {
            bar += 1;
        }

        let kind = if take.ghost_mode && is_ghost_bar(bar) {
            ClickKind::Silent
        } else if beat % subdivision == 0 {
            ClickKind::Accent
        } else {
            ClickKind::Normal
        };

        events.push(ClickEvent {
            sample_offset: current_sample,
            kind,
            beat,
            bar,
        });

        current_sample += samples_per_beat;
        beat += 1;
    }

    log::debug!(
        "scheduled {} beats over {} bars ({} samples/beat, {} samples total, ghost={})",
        events.len(),
        bar,
        samples_per_beat,
        total_samples,
        take.ghost_mode
    );

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CadenceError;

    fn take(bpm: u32, subdivision: u32, duration: f64, ghost: bool) -> TakeSpec {
        TakeSpec::new(TempoSpec::new(bpm, subdivision), duration, ghost)
    }

    #[test]
    fn test_two_second_take_at_120() {
        let events = schedule(&take(120, 4, 2.0, false)).unwrap();
        let offsets: Vec<usize> = events.iter().map(|e| e.sample_offset).collect();
        let kinds: Vec<ClickKind> = events.iter().map(|e| e.kind).collect();

        assert_eq!(offsets, vec![0, 22_050, 44_100, 66_150]);
        assert_eq!(
            kinds,
            vec![
                ClickKind::Accent,
                ClickKind::Normal,
                ClickKind::Normal,
                ClickKind::Normal
            ]
        );
        assert!(events.iter().all(|e| e.bar == 1));
    }

    #[test]
    fn test_bar_numbers_advance_on_subdivision() {
        let events = schedule(&take(120, 3, 5.0, false)).unwrap();
        let bars: Vec<u32> = events.iter().map(|e| e.bar).collect();
        assert_eq!(bars, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4]);
        let accents: Vec<u32> = events
            .iter()
            .filter(|e| e.kind == ClickKind::Accent)
            .map(|e| e.beat)
            .collect();
        assert_eq!(accents, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_ghost_mode_mutes_fourth_bar() {
        // 120 bpm, 4/4: one bar = 2 seconds, 10 seconds = 5 bars
        let events = schedule(&take(120, 4, 10.0, true)).unwrap();
        assert_eq!(events.len(), 20);

        for event in &events {
            if event.bar == 4 {
                assert_eq!(event.kind, ClickKind::Silent, "beat {}", event.beat);
            } else {
                assert!(event.kind.is_audible(), "beat {}", event.beat);
            }
        }
        // Time keeps running through the muted bar
        for pair in events.windows(2) {
            assert_eq!(pair[1].sample_offset - pair[0].sample_offset, 22_050);
        }
        // Bar 5 starts with an accent again
        assert_eq!(events[16].bar, 5);
        assert_eq!(events[16].kind, ClickKind::Accent);
    }

    #[test]
    fn test_ghost_mode_off_keeps_every_bar() {
        let events = schedule(&take(120, 4, 10.0, false)).unwrap();
        assert!(events.iter().all(|e| e.kind.is_audible()));
    }

    #[test]
    fn test_shorter_than_one_beat() {
        // One beat at 60 bpm lasts one second
        let events = schedule(&take(60, 4, 0.3, true)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sample_offset, 0);
        assert_eq!(events[0].kind, ClickKind::Accent);
    }

    #[test]
    fn test_last_beat_starts_inside_take() {
        // 160 bpm: 16537 samples per beat, 441000 samples in 10 s
        let t = take(160, 4, 10.0, false);
        let events = schedule(&t).unwrap();
        let total = t.total_samples(SAMPLE_RATE);
        let last = events.last().unwrap();
        assert!(last.sample_offset < total);
        assert!(last.sample_offset + 16_537 >= total);
        assert_eq!(events.len(), (total + 16_536) / 16_537);
    }

    #[test]
    fn test_schedule_beats_uses_given_tempo() {
        let t = take(60, 4, 2.0, false);
        let events = schedule_beats(&TempoSpec::new(120, 4), &t).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].sample_offset, 22_050);
    }

    #[test]
    fn test_invalid_parameters_fail() {
        for t in [take(0, 4, 2.0, false), take(120, 0, 2.0, false), take(120, 4, 0.0, false)] {
            assert!(matches!(schedule(&t), Err(CadenceError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_is_ghost_bar() {
        let ghost: Vec<u32> = (1..=12).filter(|&b| is_ghost_bar(b)).collect();
        assert_eq!(ghost, vec![4, 8, 12]);
    }
}
