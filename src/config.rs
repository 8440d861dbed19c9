//! Trainer configuration
//!
//! Defaults for a practice session, optionally read from a JSON file:
//!
//! ```json
//! { "bpm": 95, "duration_seconds": 60, "ghost_mode": true }
//! ```
//!
//! Missing fields keep their defaults.

use crate::scheduler::{DEFAULT_SUBDIVISION, PRACTICAL_BPM, PRACTICAL_DURATION_SECONDS};
use crate::session::DEFAULT_HISTORY_WINDOW;
use crate::{CadenceError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Session defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Starting tempo
    pub bpm: u32,
    /// Take length in seconds
    pub duration_seconds: f64,
    /// Beats per bar
    pub subdivision: u32,
    /// Start with Ghost Mode enabled
    pub ghost_mode: bool,
    /// Goal tempo drawn on the trend chart
    pub target_bpm: u32,
    /// Number of entries shown in chart and table
    pub history_window: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            bpm: 85,
            duration_seconds: 30.0,
            subdivision: DEFAULT_SUBDIVISION,
            ghost_mode: false,
            target_bpm: 120,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl TrainerConfig {
    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CadenceError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_str(text)
            .map_err(|e| CadenceError::Config(format!("Malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values outside the practice ranges
    pub fn validate(&self) -> Result<()> {
        if !PRACTICAL_BPM.contains(&self.bpm) {
            return Err(CadenceError::InvalidParameter(format!(
                "bpm {} outside {}..={}",
                self.bpm,
                PRACTICAL_BPM.start(),
                PRACTICAL_BPM.end()
            )));
        }
        if !PRACTICAL_DURATION_SECONDS.contains(&self.duration_seconds) {
            return Err(CadenceError::InvalidParameter(format!(
                "duration {}s outside {}..={}s",
                self.duration_seconds,
                PRACTICAL_DURATION_SECONDS.start(),
                PRACTICAL_DURATION_SECONDS.end()
            )));
        }
        if self.subdivision == 0 {
            return Err(CadenceError::InvalidParameter(
                "subdivision must be positive".to_string(),
            ));
        }
        if self.target_bpm == 0 {
            return Err(CadenceError::InvalidParameter(
                "target bpm must be positive".to_string(),
            ));
        }
        if self.history_window == 0 {
            return Err(CadenceError::InvalidParameter(
                "history window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
