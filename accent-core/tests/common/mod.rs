//! Synthetic speech for pipeline tests
//!
//! Each mora is a sine tone shaped by a raised-sine envelope, so syllable
//! boundaries show up as energy dips the segmenter can find.

#![allow(dead_code)]

/// One synthetic mora: F0 in Hz and length in ms.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticMora {
    pub frequency: f64,
    pub duration_ms: f64,
}

pub fn mora(frequency: f64, duration_ms: f64) -> SyntheticMora {
    SyntheticMora {
        frequency,
        duration_ms,
    }
}

/// Renders the morae back to back with a continuous phase.
pub fn synthesize(morae: &[SyntheticMora], sample_rate: u32) -> Vec<f32> {
    let mut samples = Vec::new();
    let mut phase = 0.0f64;
    for m in morae {
        let n = (sample_rate as f64 * m.duration_ms / 1000.0) as usize;
        for i in 0..n {
            let envelope = (std::f64::consts::PI * (i as f64 + 0.5) / n as f64).sin();
            samples.push((0.5 * envelope * phase.sin()) as f32);
            phase += 2.0 * std::f64::consts::PI * m.frequency / sample_rate as f64;
        }
    }
    samples
}

/// A steady tone without envelope.
pub fn steady_tone(frequency: f64, duration_ms: f64, sample_rate: u32) -> Vec<f32> {
    let n = (sample_rate as f64 * duration_ms / 1000.0) as usize;
    (0..n)
        .map(|i| {
            (0.5 * (2.0 * std::f64::consts::PI * frequency * i as f64 / sample_rate as f64).sin())
                as f32
        })
        .collect()
}
