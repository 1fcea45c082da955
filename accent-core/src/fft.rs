//! # Windowing and FFT Autocorrelation
//!
//! Frame-level signal helpers for the pitch tracker: Hamming windowing and a
//! linear autocorrelation computed through a zero-padded FFT.
//!
//! ## Features
//! - Hamming window generation and in-place application
//! - FFT plans built once per analyzer and reused for every frame
//! - Zero padding to at least `frame_len + max_lag`, so the circular FFT
//!   correlation equals the linear one for every lag that is read back

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Builds a Hamming window of length `n`: `0.54 - 0.46 * cos(2πi / (n - 1))`.
pub fn hamming_window(n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let n_minus_1 = (n - 1) as f32;
            (0..n)
                .map(|i| 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / n_minus_1).cos())
                .collect()
        }
    }
}

/// Multiplies `buffer` sample-by-sample with `window`.
///
/// Samples past the end of the shorter slice are left untouched.
pub fn apply_window(buffer: &mut [f32], window: &[f32]) {
    for (sample, w) in buffer.iter_mut().zip(window) {
        *sample *= w;
    }
}

/// Computes linear autocorrelations `r[k] = Σ x[i]·x[i+k]` for `k` in `0..=max_lag`.
///
/// The forward and inverse plans are created once; `Fft` plans are `Send + Sync`
/// so one autocorrelator can serve concurrent callers.
#[derive(Clone)]
pub struct Autocorrelator {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    fft_len: usize,
    max_lag: usize,
}

impl std::fmt::Debug for Autocorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocorrelator")
            .field("fft_len", &self.fft_len)
            .field("max_lag", &self.max_lag)
            .finish()
    }
}

impl Autocorrelator {
    /// Plans FFTs for frames of `frame_len` samples, reading lags up to `max_lag`.
    pub fn new(frame_len: usize, max_lag: usize) -> Self {
        let fft_len = (frame_len + max_lag).max(1).next_power_of_two();
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(fft_len),
            inverse: planner.plan_fft_inverse(fft_len),
            fft_len,
            max_lag,
        }
    }

    /// Returns `max_lag + 1` autocorrelation values of `frame`.
    ///
    /// Frames longer than the planned length are truncated.
    pub fn autocorrelate(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .take(self.fft_len)
            .map(|&sample| Complex { re: sample, im: 0.0 })
            .collect();
        buffer.resize(self.fft_len, Complex { re: 0.0, im: 0.0 });

        self.forward.process(&mut buffer);
        for bin in buffer.iter_mut() {
            // Power spectrum; its inverse transform is the autocorrelation.
            *bin = Complex {
                re: bin.norm_sqr(),
                im: 0.0,
            };
        }
        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.fft_len as f32;
        buffer
            .iter()
            .take(self.max_lag + 1)
            .map(|c| c.re * scale)
            .collect()
    }
}
