//! # Voxmorph — real-time formant morphing
//!
//! Shifts vocal formants (F1..F15) independently of pitch: the spectral
//! envelope is warped so detected formants land on configured targets
//! while the voiced excitation passes through untouched.
//!
//! ## Architecture
//!
//! Voxmorph is an umbrella crate that coordinates:
//! - **voxmorph-core** - shared types (`ProcessSpec`, errors, lock-free
//!   parameter cells, parameter ranges)
//! - **voxmorph-dsp** - the spectral core (STFT analysis, cepstral
//!   envelope extraction, formant detection, piecewise warping,
//!   overlap-add resynthesis)
//!
//! The facade adds [`FormantMorpher`], the block-level shell a host would
//! own: it pulls parameters from lock-free cells, keeps a dry copy, runs
//! the wet path through the [`SpectralProcessor`], and applies dry/wet
//! mix, output gain, and a safety soft clip.
//!
//! ## Quick start
//!
//! ```
//! use voxmorph::prelude::*;
//!
//! let mut morpher = FormantMorpher::builder()
//!     .mix_percent(100.0)
//!     .output_gain_db(0.0)
//!     .build();
//!
//! let spec = ProcessSpec::new(48_000.0, 512, 2)?;
//! morpher.prepare(&spec);
//!
//! // UI thread: wait-free parameter writes through the shared cells.
//! let params = morpher.params();
//! params.set_formant_hz(0, 700.0);
//!
//! // Audio thread: in-place block processing.
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! morpher.process(&mut [&mut left[..], &mut right[..]], 512);
//! # Ok::<(), voxmorph::Error>(())
//! ```

/// Re-export of voxmorph-core for direct access.
pub use voxmorph_core as core;

pub use voxmorph_core::{AtomicFloat, Error, ParameterRange, ProcessSpec, Result};

/// Re-export of voxmorph-dsp for direct access.
pub use voxmorph_dsp as dsp;

pub use voxmorph_dsp::{
    EnvelopeExtractor, FormantDetector, FormantWarper, HannWindow, RealFft, SpectralProcessor,
    VisualizationData, VisualizationHandle, WarpingPoint, DEFAULT_TARGET_FORMANTS_HZ, FFT_SIZE,
    HOP_SIZE, NUM_BINS, NUM_FORMANTS,
};

mod morph;

pub use morph::{FormantMorpher, FormantMorpherBuilder, MorphParams};

/// Convenience prelude for common imports.
pub mod prelude {
    pub use crate::core::{ProcessSpec, Result};
    pub use crate::dsp::{SpectralProcessor, NUM_FORMANTS};
    pub use crate::{FormantMorpher, MorphParams, VisualizationHandle};
}
