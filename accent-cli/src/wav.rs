//! # WAV Input/Output
//!
//! Loads recordings for analysis and stores captured takes. Integer formats are
//! scaled to [-1.0, 1.0]; multi-channel files are averaged down to mono.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Reads a WAV file as mono f32 samples.
///
/// # Returns
/// * `Ok((samples, sample_rate))` - Mono PCM and the file's sample rate
/// * `Err(e)` - The file is missing, malformed or uses an unsupported bit depth
pub fn read_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Failed to decode float samples in '{}'", path.display()))?,
        hound::SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                bail!(
                    "Unsupported bit depth {} in '{}'",
                    spec.bits_per_sample,
                    path.display()
                );
            }
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| {
                    format!("Failed to decode integer samples in '{}'", path.display())
                })?
        }
    };

    debug!(
        path = %path.display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = interleaved.len() / channels,
        "Loaded WAV file"
    );

    Ok((downmix(&interleaved, channels), spec.sample_rate))
}

/// Averages interleaved frames of `channels` samples into one channel.
///
/// A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Writes mono samples as a 32-bit float WAV file.
pub fn write_mono_f32(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file '{}'", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file '{}'", path.display()))?;
    Ok(())
}
