//! # Pitch Contour Extraction
//!
//! Estimates the fundamental frequency (F0) of a speech buffer over time with
//! windowed autocorrelation.
//!
//! ## Algorithm
//! - 30 ms Hamming-windowed frames advanced by a 10 ms hop
//! - Autocorrelation over the lags of the allowed F0 range (80-400 Hz by default)
//! - The lag with the highest raw correlation picks the periodicity peak
//! - That lag is refined on the correlation normalized by the window's own
//!   autocorrelation, which removes the pull of the Hamming taper toward
//!   shorter lags
//! - Frames whose normalized correlation at the refined lag does not exceed the
//!   voicing threshold are dropped, not zero-filled

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fft::{Autocorrelator, apply_window, hamming_window};

/// A single F0 sample of the pitch contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchPoint {
    /// Milliseconds from buffer start (centre of the analysis window).
    pub time: f32,
    /// Estimated fundamental frequency in Hz.
    pub frequency: f32,
    /// Text of the mora this sample fell into; empty until segmentation.
    pub mora: String,
}

/// Result of analysing one voiced frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEstimate {
    /// Period in samples.
    pub lag: usize,
    /// Estimated F0 in Hz, `sample_rate / lag`.
    pub frequency: f32,
    /// Window-normalized correlation at `lag`, 1.0 for a perfectly periodic frame.
    pub clarity: f32,
}

/// Frame-by-frame autocorrelation pitch tracker.
///
/// Owns the Hamming window, the window's normalized autocorrelation and the FFT
/// plans, so repeated calls only allocate per-frame scratch.
#[derive(Debug, Clone)]
pub struct PitchTracker {
    sample_rate: u32,
    window: Vec<f32>,
    /// `r_w[k] / r_w[0]` of the Hamming window itself.
    window_correlation: Vec<f32>,
    autocorrelator: Autocorrelator,
    hop: usize,
    min_lag: usize,
    max_lag: usize,
    voicing_threshold: f32,
}

impl PitchTracker {
    /// Validates `config` and builds a tracker from it.
    ///
    /// # Returns
    /// * `Ok(tracker)` - Window, taper correlation and FFT plans are ready
    /// * `Err(e)` - The frequency bounds, window sizes or threshold are unusable
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let window_len = config.pitch_window_samples();
        let max_lag = config.max_lag();
        let window = hamming_window(window_len);
        let autocorrelator = Autocorrelator::new(window_len, max_lag);

        let raw = autocorrelator.autocorrelate(&window);
        let zero_lag = raw.first().copied().unwrap_or(0.0);
        let window_correlation = if zero_lag > 0.0 {
            raw.iter().map(|r| r / zero_lag).collect()
        } else {
            vec![0.0; raw.len()]
        };

        Ok(Self {
            sample_rate: config.sample_rate,
            window,
            window_correlation,
            autocorrelator,
            hop: config.pitch_hop_samples().max(1),
            min_lag: config.min_lag().max(1),
            max_lag,
            voicing_threshold: config.voicing_threshold,
        })
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Estimates the F0 of a single frame of `window_len()` samples.
    ///
    /// # Returns
    /// * `Some(estimate)` - The frame is voiced
    /// * `None` - Silence, noise or a frame of the wrong length
    pub fn estimate_frame(&self, frame: &[f32]) -> Option<FrameEstimate> {
        if frame.len() != self.window.len() || self.min_lag > self.max_lag {
            return None;
        }

        let mut windowed = frame.to_vec();
        apply_window(&mut windowed, &self.window);
        let correlation = self.autocorrelator.autocorrelate(&windowed);

        let zero_lag = correlation[0];
        // Also rejects NaN from malformed input.
        if !(zero_lag > 0.0) {
            return None;
        }

        // Raw maximum; strict comparison keeps the shortest lag on ties.
        let mut best_lag = self.min_lag;
        for lag in self.min_lag + 1..=self.max_lag {
            if correlation[lag] > correlation[best_lag] {
                best_lag = lag;
            }
        }

        let normalized = |lag: usize| {
            let taper = self.window_correlation[lag];
            if taper > 0.0 {
                correlation[lag] / zero_lag / taper
            } else {
                0.0
            }
        };

        // Hill-climb to the local maximum of the taper-corrected correlation.
        let mut lag = best_lag;
        loop {
            if lag < self.max_lag && normalized(lag + 1) > normalized(lag) {
                lag += 1;
            } else if lag > self.min_lag && normalized(lag - 1) > normalized(lag) {
                lag -= 1;
            } else {
                break;
            }
        }

        let clarity = normalized(lag);
        if clarity.is_finite() && clarity > self.voicing_threshold {
            Some(FrameEstimate {
                lag,
                frequency: self.sample_rate as f32 / lag as f32,
                clarity,
            })
        } else {
            None
        }
    }

    /// Slides the analysis window across `audio` and returns the voiced frames.
    ///
    /// Time values are strictly increasing; buffers shorter than one window
    /// produce an empty contour.
    pub fn extract(&self, audio: &[f32]) -> Vec<PitchPoint> {
        let window_len = self.window.len();
        let mut contour = Vec::new();
        if window_len == 0 || audio.len() < window_len {
            debug!(
                samples = audio.len(),
                window = window_len,
                "Buffer shorter than one pitch window"
            );
            return contour;
        }

        let mut frames = 0usize;
        let mut start = 0usize;
        while start + window_len <= audio.len() {
            frames += 1;
            if let Some(estimate) = self.estimate_frame(&audio[start..start + window_len]) {
                let centre = start as f32 + window_len as f32 / 2.0;
                contour.push(PitchPoint {
                    time: centre * 1000.0 / self.sample_rate as f32,
                    frequency: estimate.frequency,
                    mora: String::new(),
                });
            }
            start += self.hop;
        }

        debug!(frames, voiced = contour.len(), "Extracted pitch contour");
        contour
    }
}

/// Extracts a pitch contour from `audio` using a one-off tracker.
///
/// Prefer keeping a [`PitchTracker`] (or a
/// [`PitchAccentAnalyzer`](crate::analyzer::PitchAccentAnalyzer)) around when
/// analysing several buffers with the same configuration. An invalid
/// configuration yields an empty contour.
pub fn extract_pitch_contour(audio: &[f32], config: &AnalysisConfig) -> Vec<PitchPoint> {
    match PitchTracker::new(config) {
        Ok(tracker) => tracker.extract(audio),
        Err(e) => {
            warn!("Cannot extract pitch contour: {}", e);
            Vec::new()
        }
    }
}
