//! # Analyzer
//!
//! Runs the pipeline for one request:
//! tokenize → extract contour → segment → classify → match & score.
//!
//! The analyzer holds only its validated configuration and the precomputed
//! pitch-tracker tables. Every call is independent, deterministic and leaves
//! the caller's buffers untouched, so one analyzer can be shared across threads.

use tracing::{debug, warn};

use crate::PitchAccentAnalysis;
use crate::accent::classify_accent;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::mora::tokenize_morae;
use crate::pitch::PitchTracker;
use crate::scoring::{compute_confidence, matches_pattern};
use crate::segment::{Mora, assign_mora_labels, segment_morae};
use crate::stats::ContourStats;

/// Reusable pitch-accent analyzer for one audio configuration.
#[derive(Debug, Clone)]
pub struct PitchAccentAnalyzer {
    config: AnalysisConfig,
    tracker: PitchTracker,
}

impl PitchAccentAnalyzer {
    /// Validates `config` and precomputes the pitch tracker.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let tracker = PitchTracker::new(&config)?;
        Ok(Self { config, tracker })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyses `audio` (mono, `config.sample_rate`) spoken as `text`.
    ///
    /// # Arguments
    /// * `audio` - PCM samples in [-1.0, 1.0]
    /// * `text` - Target transcript; only used for mora tokenization
    /// * `expected_pattern` - Optional reference tones, one `H`/`L` per mora
    ///
    /// Never fails: silence, clipped recordings or mismatched transcripts come
    /// back as a low-confidence analysis.
    pub fn analyze(
        &self,
        audio: &[f32],
        text: &str,
        expected_pattern: Option<&str>,
    ) -> PitchAccentAnalysis {
        let tokens = tokenize_morae(text);
        let contour = self.tracker.extract(audio);

        let morae = segment_morae(audio, &contour, &tokens, &self.config);
        let (accent_type, accent_position) = classify_accent(&morae);
        let matches_native = expected_pattern.map(|pattern| matches_pattern(pattern, &morae));
        let confidence = compute_confidence(&contour, &morae);
        let contour_stats = ContourStats::from_contour(&contour);

        debug!(
            morae = morae.len(),
            voiced_frames = contour.len(),
            accent = %accent_type,
            position = ?accent_position,
            confidence,
            "Classified pitch accent"
        );

        PitchAccentAnalysis {
            pitch_pattern: assign_mora_labels(contour, &morae),
            morae,
            accent_type,
            accent_position,
            matches_native,
            confidence,
            contour_stats,
        }
    }
}

/// One-shot analysis with default parameters at `sample_rate`.
///
/// An unusable sample rate cannot raise an error here; it yields one empty,
/// zero-confidence mora per token instead.
pub fn analyze_pitch_accent(
    audio: &[f32],
    sample_rate: u32,
    text: &str,
    expected_pattern: Option<&str>,
) -> PitchAccentAnalysis {
    match PitchAccentAnalyzer::new(AnalysisConfig::with_sample_rate(sample_rate)) {
        Ok(analyzer) => analyzer.analyze(audio, text, expected_pattern),
        Err(e) => {
            warn!("Cannot analyse audio: {}", e);
            unreliable_analysis(text, expected_pattern)
        }
    }
}

fn unreliable_analysis(text: &str, expected_pattern: Option<&str>) -> PitchAccentAnalysis {
    let morae: Vec<Mora> = tokenize_morae(text)
        .into_iter()
        .map(|text| Mora {
            text,
            is_high: false,
            duration: 0.0,
            start_time: 0.0,
            pitch: 0.0,
            intensity: 0.0,
        })
        .collect();
    let (accent_type, accent_position) = classify_accent(&morae);

    PitchAccentAnalysis {
        matches_native: expected_pattern.map(|pattern| matches_pattern(pattern, &morae)),
        morae,
        accent_type,
        accent_position,
        pitch_pattern: Vec::new(),
        confidence: 0.0,
        contour_stats: None,
    }
}
