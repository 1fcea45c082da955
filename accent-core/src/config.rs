//! # Analysis Configuration
//!
//! Sample rate, F0 search range and framing parameters for the pipeline.
//! A single [`AnalysisConfig`] value is validated once and then shared by every
//! stage; nothing here is global or mutable.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default sample rate of the supplied PCM buffer.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
/// Lowest F0 the pitch tracker searches for (Hz).
pub const DEFAULT_MIN_FREQUENCY: f32 = 80.0;
/// Highest F0 the pitch tracker searches for (Hz).
pub const DEFAULT_MAX_FREQUENCY: f32 = 400.0;
/// Autocorrelation window length (ms).
pub const DEFAULT_PITCH_WINDOW_MS: u32 = 30;
/// Autocorrelation hop (ms).
pub const DEFAULT_PITCH_HOP_MS: u32 = 10;
/// Energy-contour window length (ms).
pub const DEFAULT_ENERGY_WINDOW_MS: u32 = 20;
/// Energy-contour hop (ms).
pub const DEFAULT_ENERGY_HOP_MS: u32 = 10;
/// Minimum normalized correlation for a frame to count as voiced.
pub const DEFAULT_VOICING_THRESHOLD: f32 = 0.5;

const MIN_SAMPLE_RATE: u32 = 4_000;
const MAX_SAMPLE_RATE: u32 = 192_000;

/// Parameters shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sample rate of the audio buffer in Hz.
    pub sample_rate: u32,
    /// Lower bound of the F0 search range in Hz.
    pub min_frequency: f32,
    /// Upper bound of the F0 search range in Hz.
    pub max_frequency: f32,
    pub pitch_window_ms: u32,
    pub pitch_hop_ms: u32,
    pub energy_window_ms: u32,
    pub energy_hop_ms: u32,
    /// Frames whose normalized correlation does not exceed this are unvoiced.
    pub voicing_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            pitch_window_ms: DEFAULT_PITCH_WINDOW_MS,
            pitch_hop_ms: DEFAULT_PITCH_HOP_MS,
            energy_window_ms: DEFAULT_ENERGY_WINDOW_MS,
            energy_hop_ms: DEFAULT_ENERGY_HOP_MS,
            voicing_threshold: DEFAULT_VOICING_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Default parameters for audio captured at `sample_rate`.
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Checks that the parameters describe a usable pitch tracker and segmenter.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(ConfigError::SampleRateOutOfRange {
                rate: self.sample_rate,
                min: MIN_SAMPLE_RATE,
                max: MAX_SAMPLE_RATE,
            });
        }

        let bounds_ok = self.min_frequency.is_finite()
            && self.max_frequency.is_finite()
            && self.min_frequency > 0.0
            && self.min_frequency < self.max_frequency;
        if !bounds_ok {
            return Err(ConfigError::InvalidFrequencyBounds {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }

        for (field, value) in [
            ("pitch_window_ms", self.pitch_window_ms),
            ("pitch_hop_ms", self.pitch_hop_ms),
            ("energy_window_ms", self.energy_window_ms),
            ("energy_hop_ms", self.energy_hop_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLength { field });
            }
        }

        if self.pitch_hop_ms > self.pitch_window_ms {
            return Err(ConfigError::HopExceedsWindow {
                field: "pitch_hop_ms",
                hop: self.pitch_hop_ms,
                window: self.pitch_window_ms,
            });
        }
        if self.energy_hop_ms > self.energy_window_ms {
            return Err(ConfigError::HopExceedsWindow {
                field: "energy_hop_ms",
                hop: self.energy_hop_ms,
                window: self.energy_window_ms,
            });
        }

        let (min_lag, max_lag) = (self.min_lag(), self.max_lag());
        let window = self.pitch_window_samples();
        if min_lag == 0 || max_lag >= window {
            return Err(ConfigError::LagRangeExceedsWindow {
                min_lag,
                max_lag,
                window,
            });
        }

        if !(self.voicing_threshold > 0.0 && self.voicing_threshold < 1.0) {
            return Err(ConfigError::InvalidVoicingThreshold(self.voicing_threshold));
        }

        Ok(())
    }

    pub fn pitch_window_samples(&self) -> usize {
        ms_to_samples(self.pitch_window_ms, self.sample_rate)
    }

    pub fn pitch_hop_samples(&self) -> usize {
        ms_to_samples(self.pitch_hop_ms, self.sample_rate)
    }

    pub fn energy_window_samples(&self) -> usize {
        ms_to_samples(self.energy_window_ms, self.sample_rate)
    }

    pub fn energy_hop_samples(&self) -> usize {
        ms_to_samples(self.energy_hop_ms, self.sample_rate)
    }

    /// Shortest period searched, `sample_rate / max_frequency`.
    pub fn min_lag(&self) -> usize {
        (self.sample_rate as f32 / self.max_frequency) as usize
    }

    /// Longest period searched, `sample_rate / min_frequency`.
    pub fn max_lag(&self) -> usize {
        (self.sample_rate as f32 / self.min_frequency) as usize
    }

    /// Converts a sample offset into milliseconds from buffer start.
    pub fn samples_to_ms(&self, samples: usize) -> f32 {
        samples as f32 * 1000.0 / self.sample_rate as f32
    }

    /// Converts milliseconds from buffer start into a sample offset.
    pub fn ms_to_sample_index(&self, ms: f32) -> usize {
        (ms.max(0.0) * self.sample_rate as f32 / 1000.0).round() as usize
    }
}

fn ms_to_samples(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64 / 1000) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_expected_sample_counts() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pitch_window_samples(), 480);
        assert_eq!(config.pitch_hop_samples(), 160);
        assert_eq!(config.energy_window_samples(), 320);
        assert_eq!(config.energy_hop_samples(), 160);
        assert_eq!(config.min_lag(), 40);
        assert_eq!(config.max_lag(), 200);
    }

    #[test]
    fn other_sample_rates_scale_the_framing() {
        let config = AnalysisConfig::with_sample_rate(44_100);
        assert!(config.validate().is_ok());
        assert_eq!(config.pitch_window_samples(), 1323);
        assert_eq!(config.min_lag(), 110);
        assert_eq!(config.max_lag(), 551);
    }

    #[test]
    fn rejects_out_of_range_sample_rate() {
        let config = AnalysisConfig::with_sample_rate(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SampleRateOutOfRange { rate: 0, .. })
        ));
    }

    #[test]
    fn rejects_inverted_frequency_bounds() {
        let config = AnalysisConfig {
            min_frequency: 400.0,
            max_frequency: 80.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrequencyBounds { .. })
        ));

        let config = AnalysisConfig {
            min_frequency: f32::NAN,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_lag_range_longer_than_window() {
        // 50 Hz needs a 320-sample lag, the 10 ms window only holds 160.
        let config = AnalysisConfig {
            min_frequency: 50.0,
            pitch_window_ms: 10,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LagRangeExceedsWindow { window: 160, .. })
        ));
    }

    #[test]
    fn rejects_zero_and_oversized_hops() {
        let config = AnalysisConfig {
            energy_hop_ms: 0,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLength {
                field: "energy_hop_ms"
            })
        );

        let config = AnalysisConfig {
            pitch_hop_ms: 40,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HopExceedsWindow { field: "pitch_hop_ms", .. })
        ));
    }

    #[test]
    fn rejects_degenerate_voicing_threshold() {
        for threshold in [0.0, 1.0, -0.2, f32::NAN] {
            let config = AnalysisConfig {
                voicing_threshold: threshold,
                ..AnalysisConfig::default()
            };
            assert!(config.validate().is_err(), "threshold {threshold} accepted");
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "sample_rate": 22050, "max_frequency": 350.0 }"#).unwrap();
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.max_frequency, 350.0);
        assert_eq!(config.min_frequency, DEFAULT_MIN_FREQUENCY);
        assert_eq!(config.pitch_window_ms, DEFAULT_PITCH_WINDOW_MS);
    }

    #[test]
    fn millisecond_conversions_round_trip() {
        let config = AnalysisConfig::default();
        assert_eq!(config.samples_to_ms(16_000), 1000.0);
        assert_eq!(config.ms_to_sample_index(15.0), 240);
        assert_eq!(config.ms_to_sample_index(-3.0), 0);
    }
}
