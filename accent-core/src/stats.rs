use linreg::linear_regression;
use serde::{Deserialize, Serialize};

use crate::pitch::PitchPoint;
use crate::scoring::semitones_between;

/// Summary of a pitch contour for display next to the accent verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourStats {
    pub mean_frequency: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Span between the lowest and highest F0 in semitones.
    pub range_semitones: f32,
    /// Least-squares F0 trend (declination) in Hz per second; `None` with fewer
    /// than two distinct sample times.
    pub slope_hz_per_second: Option<f32>,
}

impl ContourStats {
    /// Summarizes `contour`; `None` when it has no points.
    pub fn from_contour(contour: &[PitchPoint]) -> Option<Self> {
        if contour.is_empty() {
            return None;
        }

        let frequencies = contour.iter().map(|p| p.frequency);
        let min_frequency = frequencies.clone().fold(f32::INFINITY, f32::min);
        let max_frequency = frequencies.clone().fold(f32::NEG_INFINITY, f32::max);
        let mean_frequency = frequencies.sum::<f32>() / contour.len() as f32;

        // x = seconds, y = Hz
        let (xs, ys): (Vec<f64>, Vec<f64>) = contour
            .iter()
            .map(|p| (p.time as f64 / 1000.0, p.frequency as f64))
            .unzip();
        let slope_hz_per_second = if contour.len() >= 2 {
            linear_regression::<_, _, f64>(&xs, &ys)
                .ok()
                .map(|(slope, _intercept)| slope as f32)
                .filter(|slope| slope.is_finite())
        } else {
            None
        };

        Some(Self {
            mean_frequency,
            min_frequency,
            max_frequency,
            range_semitones: semitones_between(max_frequency, min_frequency),
            slope_hz_per_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: f32, frequency: f32) -> PitchPoint {
        PitchPoint {
            time,
            frequency,
            mora: String::new(),
        }
    }

    #[test]
    fn empty_contour_has_no_stats() {
        assert_eq!(ContourStats::from_contour(&[]), None);
    }

    #[test]
    fn falling_contour_has_negative_slope() {
        // 240 Hz falling 40 Hz per second.
        let contour: Vec<PitchPoint> = (0..50)
            .map(|i| point(i as f32 * 10.0, 240.0 - 0.4 * i as f32))
            .collect();
        let stats = ContourStats::from_contour(&contour).unwrap();
        let slope = stats.slope_hz_per_second.unwrap();
        assert!((slope + 40.0).abs() < 0.1, "slope {slope}");
        assert_eq!(stats.max_frequency, 240.0);
        assert!((stats.min_frequency - 220.4).abs() < 1e-3);
    }

    #[test]
    fn octave_range_is_twelve_semitones() {
        let stats = ContourStats::from_contour(&[point(0.0, 100.0), point(10.0, 200.0)]).unwrap();
        assert!((stats.range_semitones - 12.0).abs() < 1e-4);
        assert_eq!(stats.mean_frequency, 150.0);
    }

    #[test]
    fn single_point_has_no_slope() {
        let stats = ContourStats::from_contour(&[point(15.0, 180.0)]).unwrap();
        assert_eq!(stats.slope_hz_per_second, None);
        assert_eq!(stats.range_semitones, 0.0);
    }
}
