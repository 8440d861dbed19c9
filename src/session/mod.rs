//! Practice Session Log
//!
//! An append-only, in-memory list of practice entries for the current
//! session. Nothing here is reloaded on the next start; the export helpers
//! only write the log out to a caller-supplied writer.

pub mod chart;
pub mod export;

pub use chart::render_trend;
pub use export::{write_csv, write_json};

use crate::scheduler::derive_rate;
use crate::{CadenceError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of entries shown in the chart and table by default
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// What a practice take concentrated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Focus {
    /// Basic groove: sitting in the pocket
    #[serde(rename = "Groove")]
    Groove,
    /// Clear articulation of every syllable
    #[serde(rename = "Articulation")]
    Articulation,
    /// Triplet flows over a straight beat
    #[serde(rename = "Triplet Flow")]
    TripletFlow,
    /// Fast-rap bursts
    #[serde(rename = "Speed Burst")]
    SpeedBurst,
    /// Improvised verses
    #[serde(rename = "Freestyle")]
    Freestyle,
}

impl Focus {
    /// Every focus area, in menu order
    pub const ALL: [Focus; 5] = [
        Focus::Groove,
        Focus::Articulation,
        Focus::TripletFlow,
        Focus::SpeedBurst,
        Focus::Freestyle,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Focus::Groove => "Groove",
            Focus::Articulation => "Articulation",
            Focus::TripletFlow => "Triplet Flow",
            Focus::SpeedBurst => "Speed Burst",
            Focus::Freestyle => "Freestyle",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Focus {
    type Err = CadenceError;

    fn from_str(value: &str) -> Result<Self> {
        let key = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match key.as_str() {
            "groove" | "basic groove" => Ok(Focus::Groove),
            "articulation" | "diction" => Ok(Focus::Articulation),
            "triplet" | "triplets" | "triplet flow" => Ok(Focus::TripletFlow),
            "speed" | "speed burst" | "fast" => Ok(Focus::SpeedBurst),
            "freestyle" => Ok(Focus::Freestyle),
            _ => Err(CadenceError::InvalidParameter(format!(
                "unknown focus '{}' (expected one of: {})",
                value.trim(),
                Focus::ALL.map(|f| f.label()).join(", ")
            ))),
        }
    }
}

/// One logged practice take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeEntry {
    /// When the take was logged (local time)
    pub timestamp: NaiveDateTime,
    /// Tempo practised
    pub bpm: u32,
    /// Syllables per second at that tempo
    pub rate: f64,
    /// What the take concentrated on
    pub focus: Focus,
    /// Take length, if known
    pub duration_seconds: Option<f64>,
}

impl PracticeEntry {
    /// Build an entry, deriving the rate from `bpm` and `subdivision`
    pub fn new(
        timestamp: NaiveDateTime,
        bpm: u32,
        subdivision: u32,
        focus: Focus,
        duration_seconds: Option<f64>,
    ) -> Self {
        PracticeEntry {
            timestamp,
            bpm,
            rate: derive_rate(bpm, subdivision),
            focus,
            duration_seconds,
        }
    }
}

/// Ordered practice history for the running session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    entries: Vec<PracticeEntry>,
}

impl SessionLog {
    /// Empty log
    pub fn new() -> Self {
        SessionLog {
            entries: Vec::new(),
        }
    }

    /// Log pre-filled with a fixed two-week history, for demos and screenshots
    pub fn with_demo_entries() -> Self {
        const BPMS: [u32; 12] = [82, 85, 85, 88, 86, 90, 94, 92, 97, 100, 98, 104];

        let start = NaiveDate::from_ymd_opt(2026, 1, 5).and_then(|d| d.and_hms_opt(19, 30, 0));
        let entries = start
            .into_iter()
            .flat_map(|start| {
                BPMS.into_iter().enumerate().map(move |(day, bpm)| {
                    PracticeEntry::new(
                        start + chrono::Duration::days(day as i64),
                        bpm,
                        crate::scheduler::DEFAULT_SUBDIVISION,
                        Focus::ALL[day % Focus::ALL.len()],
                        Some(if day % 3 == 0 { 60.0 } else { 30.0 }),
                    )
                })
            })
            .collect();

        SessionLog { entries }
    }

    /// Append a take stamped with the current local time
    pub fn record(
        &mut self,
        bpm: u32,
        subdivision: u32,
        focus: Focus,
        duration_seconds: Option<f64>,
    ) -> &PracticeEntry {
        let entry = PracticeEntry::new(
            Local::now().naive_local(),
            bpm,
            subdivision,
            focus,
            duration_seconds,
        );
        self.push(entry)
    }

    /// Append a pre-built entry
    pub fn push(&mut self, entry: PracticeEntry) -> &PracticeEntry {
        log::info!("logged {} bpm ({})", entry.bpm, entry.focus);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[PracticeEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[PracticeEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// The last `n` entries, newest first
    pub fn recent_newest_first(&self, n: usize) -> Vec<&PracticeEntry> {
        let mut recent: Vec<&PracticeEntry> = self.recent(n).iter().rev().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent
    }

    /// Text chart of the BPM of the last `window` entries against a target
    pub fn trend_chart(&self, window: usize, target_bpm: u32, height: usize) -> Vec<String> {
        let bpms: Vec<u32> = self.recent(window).iter().map(|e| e.bpm).collect();
        render_trend(&bpms, target_bpm, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = SessionLog::new();
        assert!(log.is_empty());
        assert!(log.recent(10).is_empty());
        assert!(log.trend_chart(10, 120, 8).is_empty());
    }

    #[test]
    fn test_record_derives_rate() {
        let mut log = SessionLog::new();
        let entry = log.record(120, 4, Focus::Groove, Some(30.0)).clone();
        assert_eq!(entry.bpm, 120);
        assert_relative_eq!(entry.rate, 8.0);
        assert_eq!(entry.focus, Focus::Groove);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_recent_window() {
        let mut log = SessionLog::new();
        for (i, bpm) in (80..95).enumerate() {
            log.push(PracticeEntry::new(at(1 + i as u32, 18), bpm, 4, Focus::Freestyle, None));
        }

        let recent = log.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].bpm, 85);
        assert_eq!(recent[9].bpm, 94);

        let newest = log.recent_newest_first(3);
        let bpms: Vec<u32> = newest.iter().map(|e| e.bpm).collect();
        assert_eq!(bpms, vec![94, 93, 92]);

        assert_eq!(log.recent(100).len(), 15);
    }

    #[test]
    fn test_focus_parsing() {
        assert_eq!("groove".parse::<Focus>().unwrap(), Focus::Groove);
        assert_eq!("Triplet Flow".parse::<Focus>().unwrap(), Focus::TripletFlow);
        assert_eq!("triplet-flow".parse::<Focus>().unwrap(), Focus::TripletFlow);
        assert_eq!(" SPEED ".parse::<Focus>().unwrap(), Focus::SpeedBurst);
        assert!(matches!(
            "karaoke".parse::<Focus>(),
            Err(CadenceError::InvalidParameter(_))
        ));
        for focus in Focus::ALL {
            assert_eq!(focus.label().parse::<Focus>().unwrap(), focus);
        }
    }

    #[test]
    fn test_demo_entries_are_deterministic() {
        let a = SessionLog::with_demo_entries();
        let b = SessionLog::with_demo_entries();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a
            .entries()
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp));
    }
}
