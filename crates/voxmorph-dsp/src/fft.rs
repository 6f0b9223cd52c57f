//! Real FFT wrapper with interleaved (re, im) packing.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Fixed-size real-input FFT.
///
/// `forward` reads `size` real samples from the front of the buffer and
/// writes `size` interleaved (re, im) pairs; only bins `0..=size/2` carry
/// unique information. `inverse` reads those unique bins, mirrors the
/// conjugate-symmetric upper half itself, and writes `size` real samples
/// back into the front of the buffer.
///
/// Neither direction normalizes: `inverse(forward(x)) == size * x`. Callers
/// compensate with an explicit `1/size` where needed.
pub struct RealFft {
    size: usize,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
    bins: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RealFft {
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(size);
        let inv = planner.plan_fft_inverse(size);
        let scratch_len = fwd
            .get_inplace_scratch_len()
            .max(inv.get_inplace_scratch_len());
        Self {
            size,
            fwd,
            inv,
            bins: vec![Complex::default(); size],
            scratch: vec![Complex::default(); scratch_len],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform `buf[..size]` (real signal) into `buf[..2*size]`
    /// (interleaved spectrum).
    pub fn forward(&mut self, buf: &mut [f32]) {
        debug_assert!(buf.len() >= self.size * 2);
        for (bin, &sample) in self.bins.iter_mut().zip(buf[..self.size].iter()) {
            *bin = Complex::new(sample, 0.0);
        }
        self.fwd.process_with_scratch(&mut self.bins, &mut self.scratch);
        for (k, bin) in self.bins.iter().enumerate() {
            buf[2 * k] = bin.re;
            buf[2 * k + 1] = bin.im;
        }
    }

    /// Transform `buf[..2*size]` (interleaved spectrum, bins `0..=size/2`
    /// significant) into `buf[..size]` (real signal).
    pub fn inverse(&mut self, buf: &mut [f32]) {
        debug_assert!(buf.len() >= self.size * 2);
        let half = self.size / 2;
        for k in 0..=half {
            self.bins[k] = Complex::new(buf[2 * k], buf[2 * k + 1]);
        }
        // The upper half is reconstructed from the unique bins, so stale
        // data beyond bin size/2 never leaks into the result.
        for k in 1..half {
            self.bins[self.size - k] = self.bins[k].conj();
        }
        self.inv.process_with_scratch(&mut self.bins, &mut self.scratch);
        for (slot, bin) in buf[..self.size].iter_mut().zip(self.bins.iter()) {
            *slot = bin.re;
        }
    }
}
