//! Test helpers and fixtures for voxmorph integration tests.
//!
//! ## Tolerance levels
//!
//! Use the appropriate tolerance from [`tolerances`]:
//! - `FLOAT_EPSILON` (1e-6): exact operations (pass-through, unity gain)
//! - `DSP_EPSILON` (1e-4): DSP processing (windowing, FFT round trips)
//! - `SILENCE_THRESHOLD` (1e-6): silence detection

#![allow(dead_code)]

pub mod tolerances;

use voxmorph::prelude::*;

/// Default test sample rate (matches common hardware).
pub const TEST_SAMPLE_RATE: f64 = 48_000.0;

/// Standard block size for deterministic testing.
pub const TEST_BLOCK_SIZE: usize = 512;

/// A processor prepared with the standard test spec.
pub fn prepared_processor() -> SpectralProcessor {
    let mut processor = SpectralProcessor::new();
    let spec = ProcessSpec::new(TEST_SAMPLE_RATE, TEST_BLOCK_SIZE, 2)
        .expect("valid test spec");
    processor.prepare(&spec);
    processor
}

/// Stream a mono signal through a processor in standard-sized blocks.
pub fn run_mono(processor: &mut SpectralProcessor, input: &[f32]) -> Vec<f32> {
    let mut output = vec![0.0f32; input.len()];
    for (in_block, out_block) in input
        .chunks(TEST_BLOCK_SIZE)
        .zip(output.chunks_mut(TEST_BLOCK_SIZE))
    {
        let n = in_block.len();
        processor.process(&[in_block], &mut [out_block], n);
    }
    output
}

/// Generate a sine wave at the given frequency.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence.
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate reproducible white noise in -1..1 from a simple LCG.
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// RMS level of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Assert that a signal is approximately silent.
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {max}"
    );
}

/// Assert that every sample is finite.
pub fn assert_finite(samples: &[f32]) {
    for (i, &sample) in samples.iter().enumerate() {
        assert!(sample.is_finite(), "non-finite sample {sample} at {i}");
    }
}

/// Check if two signals are approximately equal within tolerance.
pub fn signals_approx_equal(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= tolerance)
}
