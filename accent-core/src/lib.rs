// accent-core/src/lib.rs

//! The core engine for Japanese pitch-accent feedback.
//! This crate takes a recorded phrase and its transcript and decides which
//! high/low tone pattern the speaker produced. It is completely headless:
//! no audio capture, no I/O and no rendering.
//!
//! # Pipeline
//!
//! - `mora`: splits the transcript into morae
//! - `pitch`: windowed-autocorrelation F0 contour
//! - `segment`: energy-based alignment of morae to the audio
//! - `accent`: heiban / atamadaka / nakadaka / odaka classification
//! - `scoring`: reference-pattern matching and confidence
//!
//! # Example
//!
//! ```
//! use accent_core::{AccentType, analyze_pitch_accent};
//!
//! let silence = vec![0.0f32; 16_000];
//! let analysis = analyze_pitch_accent(&silence, 16_000, "これ", Some("HL"));
//! assert_eq!(analysis.morae.len(), 2);
//! assert_eq!(analysis.accent_type, AccentType::Heiban);
//! assert_eq!(analysis.confidence, 0.0);
//! ```

pub mod accent;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod fft;
pub mod mora;
pub mod pitch;
pub mod scoring;
pub mod segment;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use accent::AccentType;
pub use analyzer::{PitchAccentAnalyzer, analyze_pitch_accent};
pub use config::AnalysisConfig;
pub use error::{ConfigError, Result};
pub use mora::tokenize_morae;
pub use pitch::PitchPoint;
pub use segment::Mora;
pub use stats::ContourStats;

/// The outcome of analysing one recorded phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchAccentAnalysis {
    /// One record per tokenized mora, in order.
    pub morae: Vec<Mora>,
    /// The classified accent pattern.
    pub accent_type: AccentType,
    /// Index of the first low mora after a high one; `None` for heiban.
    pub accent_position: Option<usize>,
    /// Voiced F0 samples, labelled with the mora they fell into.
    pub pitch_pattern: Vec<PitchPoint>,
    /// Whether the tones match the reference pattern; `None` when none was given.
    pub matches_native: Option<bool>,
    /// Reliability of the result in [0, 1].
    pub confidence: f32,
    /// Contour summary; `None` when nothing was voiced.
    pub contour_stats: Option<ContourStats>,
}

impl PitchAccentAnalysis {
    /// The computed tones as an `H`/`L` string, one character per mora.
    pub fn tone_pattern(&self) -> String {
        scoring::tone_pattern(&self.morae)
    }

    /// The mora texts in order.
    pub fn mora_texts(&self) -> Vec<&str> {
        self.morae.iter().map(|m| m.text.as_str()).collect()
    }
}
