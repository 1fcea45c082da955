//! # Mora Segmentation
//!
//! Aligns the audio timeline to the tokenized morae using the dips of a
//! short-time energy contour, then measures pitch and intensity per mora.
//!
//! ## Steps
//! 1. Energy contour: sum of squared samples per 20 ms window, 10 ms hop
//! 2. Local minima of the contour (strictly lower than both neighbours)
//! 3. The `mora_count - 1` deepest minima, back in time order, become the
//!    split points after an implicit boundary at 0 ms
//! 4. Per interval: mean F0 of the contained pitch points and RMS of the samples
//! 5. Tone is relative: the first mora against the mean of the whole contour,
//!    every later mora against its predecessor

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::pitch::PitchPoint;

/// One rhythmic unit of the analysed utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mora {
    /// The mora's kana (one or two characters).
    pub text: String,
    /// Tone relative to the preceding context.
    pub is_high: bool,
    /// Length of the interval in ms.
    pub duration: f32,
    /// Start of the interval in ms from buffer start.
    pub start_time: f32,
    /// Mean F0 over the interval in Hz, 0 when no voiced frame fell inside.
    pub pitch: f32,
    /// RMS amplitude over the interval.
    pub intensity: f32,
}

impl Mora {
    /// End of the interval in ms.
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }

    /// True when at least one voiced pitch frame fell inside the interval.
    pub fn is_voiced(&self) -> bool {
        self.pitch > 0.0
    }
}

/// Energy of one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyFrame {
    /// Centre of the window in ms.
    pub time: f32,
    /// Sum of squared samples.
    pub energy: f32,
}

/// Computes the short-time energy contour of `audio`.
pub fn energy_contour(audio: &[f32], config: &AnalysisConfig) -> Vec<EnergyFrame> {
    let window = config.energy_window_samples();
    let hop = config.energy_hop_samples().max(1);
    if window == 0 || audio.len() < window {
        return Vec::new();
    }

    (0..=audio.len() - window)
        .step_by(hop)
        .map(|start| EnergyFrame {
            time: config.samples_to_ms(start) + config.samples_to_ms(window) / 2.0,
            energy: audio[start..start + window].iter().map(|s| s * s).sum(),
        })
        .collect()
}

/// Indices of frames strictly lower than both neighbours.
///
/// The first and last frames are never minima.
pub fn find_energy_minima(contour: &[EnergyFrame]) -> Vec<usize> {
    contour
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1].energy < w[0].energy && w[1].energy < w[2].energy)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Picks up to `count` split times from the deepest energy minima.
///
/// Minima are ranked by energy; equal energies keep the earlier frame. The
/// chosen frames are returned in time order, preceded by the 0 ms boundary.
pub fn select_boundaries(contour: &[EnergyFrame], count: usize) -> Vec<f32> {
    let mut minima = find_energy_minima(contour);
    minima.sort_by(|&a, &b| {
        contour[a]
            .energy
            .total_cmp(&contour[b].energy)
            .then(a.cmp(&b))
    });
    minima.truncate(count);
    minima.sort_unstable();

    std::iter::once(0.0)
        .chain(minima.into_iter().map(|i| contour[i].time))
        .collect()
}

/// Produces one [`Mora`] per entry of `morae`, aligned against `audio`.
///
/// When fewer energy minima exist than split points are needed, the last
/// segmented mora runs to the end of the clip and the remaining morae start
/// there with zero duration, pitch and intensity.
pub fn segment_morae(
    audio: &[f32],
    contour: &[PitchPoint],
    morae: &[String],
    config: &AnalysisConfig,
) -> Vec<Mora> {
    if morae.is_empty() {
        return Vec::new();
    }

    let energy = energy_contour(audio, config);
    let needed = morae.len() - 1;
    let boundaries = select_boundaries(&energy, needed);
    if boundaries.len() - 1 < needed {
        warn!(
            needed,
            found = boundaries.len() - 1,
            "Too few energy minima for the mora count; trailing morae get zero duration"
        );
    }

    let clip_end = config.samples_to_ms(audio.len());
    let contour_mean = mean(contour.iter().map(|p| p.frequency));

    let mut segmented: Vec<Mora> = Vec::with_capacity(morae.len());
    for (i, text) in morae.iter().enumerate() {
        let (start, end) = match boundaries.get(i) {
            Some(&start) => (start, boundaries.get(i + 1).copied().unwrap_or(clip_end)),
            None => (clip_end, clip_end),
        };
        let pitch = mean(
            contour
                .iter()
                .filter(|p| in_interval(p.time, start, end))
                .map(|p| p.frequency),
        );

        let first = config.ms_to_sample_index(start).min(audio.len());
        let last = config.ms_to_sample_index(end).min(audio.len()).max(first);
        let intensity = rms(&audio[first..last]);

        let is_high = match segmented.last() {
            None => pitch > contour_mean,
            Some(previous) => pitch > previous.pitch,
        };

        segmented.push(Mora {
            text: text.clone(),
            is_high,
            duration: (end - start).max(0.0),
            start_time: start,
            pitch,
            intensity,
        });
    }

    debug!(
        morae = segmented.len(),
        boundaries = ?boundaries,
        "Segmented morae"
    );
    segmented
}

/// Labels every pitch point with the text of the mora whose interval contains it.
///
/// Points outside every interval keep an empty label.
pub fn assign_mora_labels(contour: Vec<PitchPoint>, morae: &[Mora]) -> Vec<PitchPoint> {
    contour
        .into_iter()
        .map(|mut point| {
            if let Some(mora) = morae
                .iter()
                .find(|m| in_interval(point.time, m.start_time, m.end_time()))
            {
                point.mora = mora.text.clone();
            }
            point
        })
        .collect()
}

/// Half-open membership: `start <= time < end`.
fn in_interval(time: f32, start: f32, end: f32) -> bool {
    time >= start && time < end
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(energies: &[f32]) -> Vec<EnergyFrame> {
        energies
            .iter()
            .enumerate()
            .map(|(i, &energy)| EnergyFrame {
                time: 10.0 + i as f32 * 10.0,
                energy,
            })
            .collect()
    }

    fn point(time: f32, frequency: f32) -> PitchPoint {
        PitchPoint {
            time,
            frequency,
            mora: String::new(),
        }
    }

    fn texts(morae: &[&str]) -> Vec<String> {
        morae.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn energy_contour_uses_window_centres() {
        let config = AnalysisConfig::default();
        let audio = vec![0.5; 640];
        let contour = energy_contour(&audio, &config);
        assert_eq!(contour.len(), 3);
        assert_eq!(contour[0].time, 10.0);
        assert_eq!(contour[2].time, 30.0);
        assert!((contour[1].energy - 80.0).abs() < 1e-3);
    }

    #[test]
    fn minima_must_be_strictly_lower_than_both_neighbours() {
        let contour = frames(&[5.0, 3.0, 4.0, 4.0, 2.0, 2.0, 6.0, 1.0]);
        assert_eq!(find_energy_minima(&contour), vec![1]);
    }

    #[test]
    fn deepest_minima_are_selected_and_reordered_by_time() {
        let contour = frames(&[9.0, 2.0, 9.0, 1.0, 9.0, 5.0, 9.0, 3.0, 9.0]);
        assert_eq!(select_boundaries(&contour, 2), vec![0.0, 20.0, 40.0]);
        assert_eq!(select_boundaries(&contour, 3), vec![0.0, 20.0, 40.0, 80.0]);
    }

    #[test]
    fn equal_minima_prefer_the_earliest_frame() {
        let contour = frames(&[9.0, 2.0, 9.0, 2.0, 9.0, 2.0, 9.0]);
        assert_eq!(select_boundaries(&contour, 2), vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn missing_minima_leave_trailing_morae_empty() {
        let config = AnalysisConfig::default();
        let audio = vec![0.25; 1600];
        let morae = segment_morae(&audio, &[], &texts(&["あ", "い", "う"]), &config);

        assert_eq!(morae.len(), 3);
        assert_eq!(morae[0].start_time, 0.0);
        assert_eq!(morae[0].duration, 100.0);
        assert!((morae[0].intensity - 0.25).abs() < 1e-5);
        for mora in &morae[1..] {
            assert_eq!(mora.start_time, 100.0);
            assert_eq!(mora.duration, 0.0);
            assert_eq!(mora.intensity, 0.0);
            assert_eq!(mora.pitch, 0.0);
            assert!(!mora.is_high);
        }
    }

    #[test]
    fn tone_is_relative_to_contour_mean_then_previous_mora() {
        let config = AnalysisConfig::default();
        // Two bursts separated by a quiet gap around 100 ms.
        let mut audio = vec![0.5; 3200];
        for sample in &mut audio[1500..1700] {
            *sample = 0.01;
        }
        let contour = vec![point(30.0, 240.0), point(60.0, 240.0), point(150.0, 180.0)];
        let morae = segment_morae(&audio, &contour, &texts(&["こ", "れ"]), &config);

        assert_eq!(morae[0].pitch, 240.0);
        assert_eq!(morae[1].pitch, 180.0);
        assert!(morae[0].is_high, "240 Hz is above the 220 Hz contour mean");
        assert!(!morae[1].is_high);
        assert!(morae[0].end_time() <= morae[1].start_time + f32::EPSILON);
        assert_eq!(morae[1].end_time(), 200.0);
    }

    #[test]
    fn empty_transcript_yields_no_morae() {
        let config = AnalysisConfig::default();
        assert!(segment_morae(&[0.1; 800], &[], &[], &config).is_empty());
    }

    #[test]
    fn labels_follow_mora_intervals() {
        let morae = vec![
            Mora {
                text: "こ".into(),
                is_high: true,
                duration: 100.0,
                start_time: 0.0,
                pitch: 200.0,
                intensity: 0.1,
            },
            Mora {
                text: "れ".into(),
                is_high: false,
                duration: 100.0,
                start_time: 100.0,
                pitch: 150.0,
                intensity: 0.1,
            },
        ];
        let labelled = assign_mora_labels(
            vec![point(15.0, 200.0), point(100.0, 150.0), point(199.0, 150.0), point(200.0, 150.0)],
            &morae,
        );
        let labels: Vec<&str> = labelled.iter().map(|p| p.mora.as_str()).collect();
        assert_eq!(labels, vec!["こ", "れ", "れ", ""]);
    }
}
