//! Plain-text rendering of an analysis for the terminal.

use std::fmt;

use accent_core::PitchAccentAnalysis;

/// Short report with one row per mora.
pub struct Report<'a>(pub &'a PitchAccentAnalysis);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;

        writeln!(f, "Accent:      {}", analysis.accent_type)?;
        match analysis
            .accent_position
            .filter(|_| analysis.accent_type.has_drop())
        {
            Some(position) => writeln!(f, "Drop after:  {position}")?,
            None => writeln!(f, "Drop after:  none")?,
        }
        writeln!(f, "Tones:       {}", analysis.tone_pattern())?;
        writeln!(f, "Confidence:  {:.2}", analysis.confidence)?;
        match analysis.matches_native {
            Some(true) => writeln!(f, "Reference:   match")?,
            Some(false) => writeln!(f, "Reference:   MISMATCH")?,
            None => {}
        }
        match &analysis.contour_stats {
            Some(stats) => {
                let slope = stats
                    .slope_hz_per_second
                    .map_or_else(|| "n/a".to_string(), |s| format!("{s:+.1} Hz/s"));
                writeln!(
                    f,
                    "F0:          {:.1} Hz mean, {:.1}-{:.1} Hz ({:.1} st), trend {slope}",
                    stats.mean_frequency,
                    stats.min_frequency,
                    stats.max_frequency,
                    stats.range_semitones
                )?;
            }
            None => writeln!(f, "F0:          no voiced frames")?,
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<4} {:<6} {:>4} {:>9} {:>9} {:>9} {:>9}",
            "#", "mora", "tone", "start ms", "dur ms", "F0 Hz", "RMS"
        )?;
        for (i, mora) in analysis.morae.iter().enumerate() {
            writeln!(
                f,
                "{:<4} {:<6} {:>4} {:>9.1} {:>9.1} {:>9.1} {:>9.4}",
                i,
                mora.text,
                if mora.is_high { "H" } else { "L" },
                mora.start_time,
                mora.duration,
                mora.pitch,
                mora.intensity
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accent_core::{AccentType, Mora};

    fn sample_analysis() -> PitchAccentAnalysis {
        let mora = |text: &str, is_high, start_time, pitch| Mora {
            text: text.to_string(),
            is_high,
            duration: 300.0,
            start_time,
            pitch,
            intensity: 0.2,
        };
        PitchAccentAnalysis {
            morae: vec![mora("こ", true, 0.0, 250.0), mora("れ", false, 300.0, 160.0)],
            accent_type: AccentType::Atamadaka,
            accent_position: Some(1),
            pitch_pattern: Vec::new(),
            matches_native: Some(false),
            confidence: 0.86,
            contour_stats: None,
        }
    }

    #[test]
    fn report_lists_verdict_and_morae() {
        let report = Report(&sample_analysis()).to_string();
        assert!(report.contains("atamadaka (initial-high)"));
        assert!(report.contains("Drop after:  1"));
        assert!(report.contains("Tones:       HL"));
        assert!(report.contains("Confidence:  0.86"));
        assert!(report.contains("MISMATCH"));
        assert!(report.contains("no voiced frames"));
        assert_eq!(report.lines().filter(|l| l.contains("300.0")).count(), 2);
    }

    #[test]
    fn reference_line_is_omitted_without_pattern() {
        let mut analysis = sample_analysis();
        analysis.matches_native = None;
        assert!(!Report(&analysis).to_string().contains("Reference"));
    }

    #[test]
    fn flat_accent_reports_no_drop() {
        let mut analysis = sample_analysis();
        analysis.accent_type = AccentType::Heiban;
        analysis.accent_position = None;
        let report = Report(&analysis).to_string();
        assert!(report.contains("heiban (flat)"));
        assert!(report.contains("Drop after:  none"));
    }
}
