//! # Error Types
//!
//! The analysis pipeline itself never fails: silent, short or mismatched input
//! degrades into a low-confidence result instead. The only fallible step is
//! building an analyzer from a configuration that cannot describe a usable
//! pitch tracker.

use thiserror::Error;

/// Reasons an [`AnalysisConfig`](crate::config::AnalysisConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be between {min} and {max} Hz, got {rate}")]
    SampleRateOutOfRange { rate: u32, min: u32, max: u32 },

    #[error("frequency bounds must be finite, positive and ordered (min < max), got {min} Hz .. {max} Hz")]
    InvalidFrequencyBounds { min: f32, max: f32 },

    #[error("{field} must be greater than zero")]
    ZeroLength { field: &'static str },

    #[error("{field} ({hop} ms) cannot exceed its analysis window ({window} ms)")]
    HopExceedsWindow {
        field: &'static str,
        hop: u32,
        window: u32,
    },

    #[error("lag range {min_lag}..={max_lag} samples does not fit in a {window}-sample pitch window\n  Tip: lengthen pitch_window_ms or raise min_frequency")]
    LagRangeExceedsWindow {
        min_lag: usize,
        max_lag: usize,
        window: usize,
    },

    #[error("voicing threshold must lie strictly between 0 and 1, got {0}")]
    InvalidVoicingThreshold(f32),
}

/// Result type alias for fallible accent-core operations
pub type Result<T> = std::result::Result<T, ConfigError>;
