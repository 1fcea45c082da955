//! # Accent Classification
//!
//! Maps the high/low tone sequence of the segmented morae onto one of the four
//! Tokyo-dialect accent classes, locating the first high-to-low drop.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::segment::Mora;

/// The four canonical pitch-accent classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccentType {
    /// Flat, no drop.
    Heiban,
    /// Drop right after the first mora.
    Atamadaka,
    /// Drop after an interior mora.
    Nakadaka,
    /// Drop at the final unit, surfacing on a following particle.
    Odaka,
}

impl AccentType {
    /// Romanized class name.
    pub fn name(self) -> &'static str {
        match self {
            AccentType::Heiban => "heiban",
            AccentType::Atamadaka => "atamadaka",
            AccentType::Nakadaka => "nakadaka",
            AccentType::Odaka => "odaka",
        }
    }

    /// Short English gloss of the contour shape.
    pub fn description(self) -> &'static str {
        match self {
            AccentType::Heiban => "flat",
            AccentType::Atamadaka => "initial-high",
            AccentType::Nakadaka => "mid-high",
            AccentType::Odaka => "final-high",
        }
    }

    /// Whether this class carries a pitch drop inside the word.
    pub fn has_drop(self) -> bool {
        !matches!(self, AccentType::Heiban)
    }
}

impl fmt::Display for AccentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Classifies a tone sequence (`true` = high).
///
/// Returns the accent class and the index of the first mora that is low after a
/// high one, or `None` for heiban. Sequences shorter than two are heiban.
pub fn classify_tones(tones: &[bool]) -> (AccentType, Option<usize>) {
    let drop = tones
        .windows(2)
        .position(|pair| pair[0] && !pair[1])
        .map(|i| i + 1);

    match drop {
        None => (AccentType::Heiban, None),
        Some(1) => (AccentType::Atamadaka, Some(1)),
        Some(i) if i == tones.len() - 1 => (AccentType::Odaka, Some(i)),
        Some(i) => (AccentType::Nakadaka, Some(i)),
    }
}

/// Classifies segmented morae by their `is_high` tags.
pub fn classify_accent(morae: &[Mora]) -> (AccentType, Option<usize>) {
    let tones: Vec<bool> = morae.iter().map(|m| m.is_high).collect();
    classify_tones(&tones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tones(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == 'H').collect()
    }

    #[test]
    fn no_drop_is_heiban() {
        assert_eq!(classify_tones(&tones("LHHH")), (AccentType::Heiban, None));
        assert_eq!(classify_tones(&tones("LLLL")), (AccentType::Heiban, None));
        assert_eq!(classify_tones(&tones("LLLH")), (AccentType::Heiban, None));
    }

    #[test]
    fn short_sequences_are_heiban() {
        assert_eq!(classify_tones(&[]), (AccentType::Heiban, None));
        assert_eq!(classify_tones(&[true]), (AccentType::Heiban, None));
    }

    #[test]
    fn drop_after_first_mora_is_atamadaka() {
        assert_eq!(classify_tones(&tones("HLLL")), (AccentType::Atamadaka, Some(1)));
        // Two morae: the drop at index 1 is both first and last; atamadaka wins.
        assert_eq!(classify_tones(&tones("HL")), (AccentType::Atamadaka, Some(1)));
    }

    #[test]
    fn interior_drop_is_nakadaka() {
        assert_eq!(classify_tones(&tones("LHLL")), (AccentType::Nakadaka, Some(2)));
        assert_eq!(classify_tones(&tones("LHHLL")), (AccentType::Nakadaka, Some(3)));
    }

    #[test]
    fn drop_at_last_mora_is_odaka() {
        assert_eq!(classify_tones(&tones("LHL")), (AccentType::Odaka, Some(2)));
        assert_eq!(classify_tones(&tones("LHHHL")), (AccentType::Odaka, Some(4)));
    }

    #[test]
    fn only_the_first_drop_counts() {
        assert_eq!(classify_tones(&tones("LHLHL")), (AccentType::Nakadaka, Some(2)));
    }

    #[test]
    fn serializes_as_uppercase_names() {
        assert_eq!(serde_json::to_string(&AccentType::Nakadaka).unwrap(), "\"NAKADAKA\"");
        let parsed: AccentType = serde_json::from_str("\"ODAKA\"").unwrap();
        assert_eq!(parsed, AccentType::Odaka);
    }

    #[test]
    fn display_includes_gloss() {
        assert_eq!(AccentType::Atamadaka.to_string(), "atamadaka (initial-high)");
        assert!(!AccentType::Heiban.has_drop());
        assert!(AccentType::Odaka.has_drop());
    }
}
