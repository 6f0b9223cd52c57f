//! Tolerance levels for voxmorph integration tests.

/// Exact operations: pass-through, unity gain.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// DSP processing: windowing, FFT round trips, warp interpolation.
pub const DSP_EPSILON: f32 = 1e-4;

/// Silence detection.
pub const SILENCE_THRESHOLD: f32 = 1e-6;

/// Allowed RMS drift through an identity-warp pipeline, in dB.
pub const RMS_DRIFT_DB: f32 = 3.0;
