//! # Pattern Matching and Confidence
//!
//! Compares the computed tones with a reference `H`/`L` pattern and scores how
//! far the segmentation can be trusted.
//!
//! Confidence blends two signals, clipped to [0, 1]:
//! - pitch density, voiced frames per mora
//! - variation quality, the high/low excursion in semitones (3-8 is natural
//!   for Japanese pitch accent)

use crate::pitch::PitchPoint;
use crate::segment::Mora;

const DENSITY_WEIGHT: f32 = 0.3;
const VARIATION_WEIGHT: f32 = 0.7;
/// Variation score when either tone group is missing or the excursion is implausible.
const NEUTRAL_VARIATION: f32 = 0.5;

/// Interval from `low_hz` to `high_hz` in equal-tempered semitones.
pub fn semitones_between(high_hz: f32, low_hz: f32) -> f32 {
    12.0 * (high_hz / low_hz).log2()
}

/// Interval from `low_hz` to `high_hz` in cents.
pub fn cents_between(high_hz: f32, low_hz: f32) -> f32 {
    100.0 * semitones_between(high_hz, low_hz)
}

/// Converts a reference pattern into tones; `None` if any character is not `H` or `L`.
pub fn parse_tone_pattern(pattern: &str) -> Option<Vec<bool>> {
    pattern
        .chars()
        .map(|c| match c {
            'H' => Some(true),
            'L' => Some(false),
            _ => None,
        })
        .collect()
}

/// Renders tones as an `H`/`L` string.
pub fn tone_pattern(morae: &[Mora]) -> String {
    morae
        .iter()
        .map(|m| if m.is_high { 'H' } else { 'L' })
        .collect()
}

/// True only when `expected` has one tone per mora and every tone agrees.
///
/// A length mismatch or any character other than `H`/`L` is a mismatch; there
/// is no partial credit.
pub fn matches_pattern(expected: &str, morae: &[Mora]) -> bool {
    match parse_tone_pattern(expected) {
        Some(tones) => {
            tones.len() == morae.len()
                && tones.iter().zip(morae).all(|(&tone, mora)| tone == mora.is_high)
        }
        None => false,
    }
}

/// Voiced pitch frames per mora; 0 when there are no morae.
pub fn pitch_density(contour: &[PitchPoint], morae: &[Mora]) -> f32 {
    if morae.is_empty() {
        0.0
    } else {
        contour.len() as f32 / morae.len() as f32
    }
}

/// Scores the excursion between the mean high and mean low mora pitch.
///
/// Unvoiced morae (pitch 0) belong to neither group.
pub fn variation_quality(morae: &[Mora]) -> f32 {
    let voiced = morae.iter().filter(|m| m.is_voiced());
    let (high, low): (Vec<&Mora>, Vec<&Mora>) = voiced.partition(|m| m.is_high);
    if high.is_empty() || low.is_empty() {
        return NEUTRAL_VARIATION;
    }

    let mean_pitch = |group: &[&Mora]| group.iter().map(|m| m.pitch).sum::<f32>() / group.len() as f32;
    let semitones = semitones_between(mean_pitch(&high), mean_pitch(&low));

    if (3.0..=8.0).contains(&semitones) {
        1.0
    } else if (2.0..=10.0).contains(&semitones) {
        0.8
    } else {
        NEUTRAL_VARIATION
    }
}

/// Overall reliability of an analysis in [0, 1].
///
/// An empty contour carries no evidence and scores exactly 0.
pub fn compute_confidence(contour: &[PitchPoint], morae: &[Mora]) -> f32 {
    if contour.is_empty() {
        return 0.0;
    }
    let score = DENSITY_WEIGHT * pitch_density(contour, morae)
        + VARIATION_WEIGHT * variation_quality(morae);
    score.clamp(0.0, 1.0)
}
