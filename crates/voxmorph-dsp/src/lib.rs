//! # Voxmorph DSP
//!
//! The spectral formant morphing core: a real-time STFT pipeline that
//! shifts vocal formants while preserving pitch and harmonic structure.
//!
//! Per analysis frame the [`SpectralProcessor`]:
//! 1. windows the latest `FFT_SIZE` input samples (Hann),
//! 2. extracts the smooth spectral envelope via cepstral liftering,
//! 3. detects the `NUM_FORMANTS` strongest spectral peaks,
//! 4. builds a piecewise-linear warp from detected to target formants,
//! 5. substitutes the warped envelope multiplicatively (phase preserved),
//! 6. resynthesizes by inverse FFT and Hann overlap-add.
//!
//! Everything on the audio path is allocation-free after construction.
//! The visualization snapshot is published with a non-blocking `try_lock`;
//! dropped updates are acceptable because the UI polls below the hop rate.

mod detect;
mod envelope;
mod fft;
mod processor;
mod snapshot;
mod warp;
mod window;

pub use detect::FormantDetector;
pub use envelope::{EnvelopeExtractor, DEFAULT_CUTOFF_BIN};
pub use fft::RealFft;
pub use processor::{SpectralProcessor, DEFAULT_TARGET_FORMANTS_HZ};
pub use snapshot::{VisualizationData, VisualizationHandle};
pub use warp::{FormantWarper, WarpingPoint};
pub use window::HannWindow;

/// STFT frame length. Power of two.
pub const FFT_SIZE: usize = 1024;

/// Analysis hop: 75% overlap.
pub const HOP_SIZE: usize = FFT_SIZE / 4;

/// Half-spectrum size (bins 0..=FFT_SIZE/2 carry unique information).
pub const NUM_BINS: usize = FFT_SIZE / 2 + 1;

/// Number of tracked formants (F1..F15).
pub const NUM_FORMANTS: usize = 15;
