//! Cepstral extraction of the smooth spectral envelope.
//!
//! Source-filter theory: a voiced spectrum is the product of an excitation
//! (pitch and harmonics) and a vocal-tract transfer function. Taking the
//! log turns the product into a sum whose two terms occupy disjoint
//! quefrency regions of the cepstrum, so low-quefrency liftering isolates
//! the smooth envelope.

use crate::fft::RealFft;

/// Default lifter width in quefrency bins. Lower values yield a smoother
/// envelope.
pub const DEFAULT_CUTOFF_BIN: usize = 30;

/// Magnitudes are floored here before the log.
const LOG_FLOOR: f32 = 1e-9;

/// The log envelope is clamped to ±this before exponentiation.
const LOG_CLAMP: f32 = 20.0;

/// Extracts a smooth magnitude envelope from a half-spectrum of
/// magnitudes via real-cepstrum liftering.
pub struct EnvelopeExtractor {
    fft: RealFft,
    cutoff_bin: usize,
    buffer: Vec<f32>,
}

impl EnvelopeExtractor {
    pub fn new(fft_size: usize) -> Self {
        Self::with_cutoff(fft_size, DEFAULT_CUTOFF_BIN)
    }

    pub fn with_cutoff(fft_size: usize, cutoff_bin: usize) -> Self {
        debug_assert!(cutoff_bin < fft_size / 2);
        Self {
            fft: RealFft::new(fft_size),
            cutoff_bin,
            buffer: vec![0.0; fft_size * 2],
        }
    }

    /// Fill `envelope` with the smooth envelope of `magnitude`.
    ///
    /// Both slices are half-spectra of length `fft_size / 2 + 1`.
    /// Allocation-free; safe to call on the audio thread.
    pub fn process(&mut self, magnitude: &[f32], envelope: &mut [f32]) {
        let n = self.fft.size();
        debug_assert_eq!(magnitude.len(), n / 2 + 1);
        debug_assert_eq!(envelope.len(), n / 2 + 1);

        self.buffer.fill(0.0);
        for (k, &mag) in magnitude.iter().enumerate() {
            self.buffer[2 * k] = mag.max(LOG_FLOOR).ln();
        }

        // Log half-spectrum -> real cepstrum (pseudo-time).
        self.fft.inverse(&mut self.buffer);

        // Lifter: keep the low quefrencies and the symmetric tail.
        for slot in self.buffer[self.cutoff_bin..n - self.cutoff_bin].iter_mut() {
            *slot = 0.0;
        }

        self.fft.forward(&mut self.buffer);

        // The inverse/forward pair multiplies by n; take it back out of the
        // log domain before exponentiating.
        let inv_n = 1.0 / n as f32;
        for (k, env) in envelope.iter_mut().enumerate() {
            let log_env = (self.buffer[2 * k] * inv_n).clamp(-LOG_CLAMP, LOG_CLAMP);
            *env = log_env.exp();
        }
    }
}
