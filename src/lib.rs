//! Rap Cadence Trainer
//!
//! Renders metronome click tracks for rhythmic speech practice and keeps a
//! log of practice sessions. The core is a deterministic click-track
//! generator: a tempo, a take length, a bar size and an optional Ghost Mode
//! (every fourth bar muted) map to a byte-identical 16-bit mono WAV asset.
//!
//! # Features
//! - Sample-accurate beat scheduling with accented downbeats
//! - Ghost Mode silent bars for internal tempo training
//! - Additive click mixing with saturating 16-bit quantisation
//! - In-memory WAV encoding (no filesystem access)
//! - Session log with trend chart and CSV/JSON export
//!
//! # Crate feature flags
//! - `streaming` (opt-in): play rendered takes on the default audio device
//!   (enables optional `rodio` dep)
//!
//! # Quick start
//! ```no_run
//! use rap_cadence::{render_take, TakeSpec, TempoSpec};
//!
//! let take = TakeSpec::new(TempoSpec::new(120, 4), 30.0, true);
//! let wav: Vec<u8> = render_take(&take).unwrap();
//! std::fs::write("click.wav", wav).unwrap();
//! ```
//!
//! ## Derived rate
//! ```
//! use rap_cadence::derive_rate;
//! assert_eq!(derive_rate(120, 4), 8.0);
//! ```

#![warn(missing_docs)]

pub mod click; // Click Synthesizer
pub mod config; // Trainer defaults (JSON)
pub mod render; // Track Renderer & WAV encoding
pub mod scheduler; // Beat Scheduler
pub mod session; // Practice log, chart, export
pub mod state; // Explicit application state
#[cfg(feature = "streaming")]
pub mod streaming; // Audio device playback

/// Sample rate of every rendered take in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Error types for click-track generation and practice logging
#[derive(thiserror::Error, Debug)]
pub enum CadenceError {
    /// Non-positive or out-of-range tempo, duration or subdivision
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The PCM container could not be written
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    /// IO error from filesystem or standard streams
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Session log could not be serialized
    #[error("Export error: {0}")]
    Export(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),
}

impl From<hound::Error> for CadenceError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => CadenceError::EncodingFailure(e.to_string()),
            other => CadenceError::EncodingFailure(other.to_string()),
        }
    }
}

impl From<csv::Error> for CadenceError {
    fn from(err: csv::Error) -> Self {
        CadenceError::Export(err.to_string())
    }
}

/// Result type for click-track operations
pub type Result<T> = std::result::Result<T, CadenceError>;

// Public API exports
pub use click::{synthesize, ClickBank, ClickPreset};
pub use config::TrainerConfig;
pub use render::{mix_events, quantize, render, render_take};
pub use scheduler::{derive_rate, schedule, schedule_beats, ClickEvent, ClickKind, TakeSpec, TempoSpec};
pub use session::{Focus, PracticeEntry, SessionLog};
pub use state::PracticeState;
#[cfg(feature = "streaming")]
pub use streaming::ClickPlayer;
