//! # Microphone Capture
//!
//! Records a take from the default input device with CPAL. The audio callback
//! forwards fixed-size blocks over a channel; the calling thread collects them
//! until the requested duration is reached.
//!
//! ## Configuration
//! - Format: 32-bit float, mono
//! - Sample rate: 16 kHz when the device supports it, otherwise the closest rate
//!   it offers (the analyzer adapts to any rate)

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Sender, bounded};
use tracing::{info, warn};

/// Samples per block sent from the audio callback.
pub const BLOCK_SIZE: usize = 1024;

/// Records `seconds` of mono audio from the default input device.
///
/// # Returns
/// * `Ok((samples, sample_rate))` - The captured take
/// * `Err(e)` - No device, no mono f32 format, or the stream failed to start
pub fn record(seconds: f32, preferred_rate: u32) -> Result<(Vec<f32>, u32)> {
    let (sender, receiver) = bounded::<Vec<f32>>(256);
    let (stream, sample_rate) = start_capture(sender, preferred_rate)?;

    let wanted = (seconds * sample_rate as f32) as usize;
    let deadline = Instant::now() + Duration::from_secs_f32(seconds + 2.0);
    let mut samples = Vec::with_capacity(wanted);

    while samples.len() < wanted {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(timeout) {
            Ok(block) => samples.extend_from_slice(&block),
            Err(_) => {
                warn!(captured = samples.len(), wanted, "Input stream stalled; keeping partial take");
                break;
            }
        }
    }
    stream.pause()?;
    samples.truncate(wanted);

    Ok((samples, sample_rate))
}

fn start_capture(sender: Sender<Vec<f32>>, preferred_rate: u32) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    info!("Using audio input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, preferred_rate)
        .ok_or_else(|| anyhow!("No mono f32 input format found"))?;

    let rate = preferred_rate.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config = supported_config.with_sample_rate(cpal::SampleRate(rate));
    let sample_rate = config.sample_rate().0;
    let config: cpal::StreamConfig = config.into();

    info!("Recording at {} Hz", sample_rate);

    let err_fn = |err| warn!("An error occurred on the audio stream: {}", err);

    let mut pending = Vec::with_capacity(BLOCK_SIZE * 2);
    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            pending.extend_from_slice(data);
            while pending.len() >= BLOCK_SIZE {
                let block: Vec<f32> = pending.drain(..BLOCK_SIZE).collect();
                // A full channel means the collector is done; drop the block.
                let _ = sender.try_send(block);
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Picks the mono f32 configuration whose rate range lies closest to `target_rate`.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.channels() == 1 && c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let (min, max) = (c.min_sample_rate().0, c.max_sample_rate().0);
            if (min..=max).contains(&target_rate) {
                0
            } else {
                min.abs_diff(target_rate).min(max.abs_diff(target_rate))
            }
        })
}
