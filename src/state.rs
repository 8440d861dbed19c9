//! Practice state
//!
//! Everything a front end needs between interactions: the current tempo and
//! take settings plus the session log. The state is created once from a
//! [`TrainerConfig`] and handed to every handler by reference.

use crate::config::TrainerConfig;
use crate::render::render_take;
use crate::scheduler::{TakeSpec, TempoSpec, PRACTICAL_BPM, PRACTICAL_DURATION_SECONDS};
use crate::session::{Focus, PracticeEntry, SessionLog};
use crate::{CadenceError, Result};

/// Current settings and history of one practice session
#[derive(Debug, Clone)]
pub struct PracticeState {
    bpm: u32,
    duration_seconds: f64,
    subdivision: u32,
    ghost_mode: bool,
    target_bpm: u32,
    history_window: usize,
    log: SessionLog,
}

impl PracticeState {
    /// Fresh state with an empty log
    pub fn new(config: &TrainerConfig) -> Self {
        Self::with_log(config, SessionLog::new())
    }

    /// State with an existing log (e.g. the demo fixture)
    pub fn with_log(config: &TrainerConfig, log: SessionLog) -> Self {
        let mut state = PracticeState {
            bpm: config.bpm,
            duration_seconds: config.duration_seconds,
            subdivision: config.subdivision.max(1),
            ghost_mode: config.ghost_mode,
            target_bpm: config.target_bpm,
            history_window: config.history_window.max(1),
            log,
        };
        state.set_bpm(config.bpm);
        state.set_duration(config.duration_seconds);
        state
    }

    /// Current tempo
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Take length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Beats per bar
    pub fn subdivision(&self) -> u32 {
        self.subdivision
    }

    /// Ghost Mode flag
    pub fn ghost_mode(&self) -> bool {
        self.ghost_mode
    }

    /// Goal tempo
    pub fn target_bpm(&self) -> u32 {
        self.target_bpm
    }

    /// Practice history
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Set the tempo, clamped to the practice range. Returns the value kept.
    pub fn set_bpm(&mut self, bpm: u32) -> u32 {
        let clamped = bpm.clamp(*PRACTICAL_BPM.start(), *PRACTICAL_BPM.end());
        if clamped != bpm {
            log::warn!("bpm {} clamped to {}", bpm, clamped);
        }
        self.bpm = clamped;
        clamped
    }

    /// Move the tempo up or down by `delta`
    pub fn nudge_bpm(&mut self, delta: i32) -> u32 {
        let bpm = (self.bpm as i64 + delta as i64).max(0) as u32;
        self.set_bpm(bpm)
    }

    /// Set the take length, clamped to the practice range
    pub fn set_duration(&mut self, seconds: f64) -> f64 {
        let clamped = if seconds.is_nan() {
            *PRACTICAL_DURATION_SECONDS.start()
        } else {
            seconds.clamp(
                *PRACTICAL_DURATION_SECONDS.start(),
                *PRACTICAL_DURATION_SECONDS.end(),
            )
        };
        if clamped != seconds {
            log::warn!("duration {}s clamped to {}s", seconds, clamped);
        }
        self.duration_seconds = clamped;
        clamped
    }

    /// Set beats per bar
    pub fn set_subdivision(&mut self, subdivision: u32) -> Result<()> {
        if subdivision == 0 {
            return Err(CadenceError::InvalidParameter(
                "subdivision must be positive".to_string(),
            ));
        }
        self.subdivision = subdivision;
        Ok(())
    }

    /// Turn Ghost Mode on or off
    pub fn set_ghost_mode(&mut self, enabled: bool) {
        log::info!("ghost mode {}", if enabled { "on" } else { "off" });
        self.ghost_mode = enabled;
    }

    /// Syllables per second at the current settings
    pub fn rate(&self) -> f64 {
        self.tempo().rate()
    }

    /// Current tempo spec
    pub fn tempo(&self) -> TempoSpec {
        TempoSpec::new(self.bpm, self.subdivision)
    }

    /// Take spec for the current settings
    pub fn take_spec(&self) -> TakeSpec {
        TakeSpec::new(self.tempo(), self.duration_seconds, self.ghost_mode)
    }

    /// Render the current take as WAV bytes
    pub fn render_take(&self) -> Result<Vec<u8>> {
        render_take(&self.take_spec())
    }

    /// Log a finished take at the current settings
    pub fn log_practice(&mut self, focus: Focus) -> &PracticeEntry {
        self.log.record(
            self.bpm,
            self.subdivision,
            focus,
            Some(self.duration_seconds),
        )
    }

    /// Recent entries, newest first
    pub fn history(&self) -> Vec<&PracticeEntry> {
        self.log.recent_newest_first(self.history_window)
    }

    /// Trend chart of the recent entries against the target tempo
    pub fn trend_chart(&self, height: usize) -> Vec<String> {
        self.log
            .trend_chart(self.history_window, self.target_bpm, height)
    }
}

impl Default for PracticeState {
    fn default() -> Self {
        Self::new(&TrainerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state_from_config() {
        let state = PracticeState::default();
        assert_eq!(state.bpm(), 85);
        assert_eq!(state.duration_seconds(), 30.0);
        assert!(!state.ghost_mode());
        assert!(state.log().is_empty());
        assert_relative_eq!(state.rate(), 85.0 * 4.0 / 60.0);
    }

    #[test]
    fn test_bpm_is_clamped() {
        let mut state = PracticeState::default();
        assert_eq!(state.set_bpm(200), 160);
        assert_eq!(state.set_bpm(10), 60);
        assert_eq!(state.nudge_bpm(-5), 60);
        assert_eq!(state.nudge_bpm(5), 65);
    }

    #[test]
    fn test_duration_is_clamped() {
        let mut state = PracticeState::default();
        assert_eq!(state.set_duration(5.0), 10.0);
        assert_eq!(state.set_duration(1000.0), 300.0);
        assert_eq!(state.set_duration(f64::NAN), 10.0);
        assert_eq!(state.set_duration(45.0), 45.0);
    }

    #[test]
    fn test_take_spec_follows_settings() {
        let mut state = PracticeState::default();
        state.set_bpm(100);
        state.set_ghost_mode(true);
        state.set_subdivision(3).unwrap();
        assert!(state.set_subdivision(0).is_err());

        let take = state.take_spec();
        assert_eq!(take.tempo, TempoSpec::new(100, 3));
        assert!(take.ghost_mode);
        assert_eq!(take.duration_seconds, 30.0);
    }

    #[test]
    fn test_log_practice_and_history() {
        let mut state = PracticeState::default();
        state.set_bpm(120);
        let entry = state.log_practice(Focus::SpeedBurst).clone();
        assert_eq!(entry.bpm, 120);
        assert_relative_eq!(entry.rate, 8.0);
        assert_eq!(entry.duration_seconds, Some(30.0));

        assert_eq!(state.history().len(), 1);
        assert!(!state.trend_chart(6).is_empty());
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut state = PracticeState::default();
        state.set_duration(10.0);
        assert_eq!(state.render_take().unwrap(), state.render_take().unwrap());
    }
}
