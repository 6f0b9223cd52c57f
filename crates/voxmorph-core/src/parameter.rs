//! Parameter ranges for host-facing controls.
//!
//! Provides clamping and normalized (0.0-1.0) ↔ real value conversion for
//! the formant, mix, and gain parameters exposed by the effect shell.

/// Linear parameter range with a default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    /// Minimum real value
    pub min: f32,
    /// Maximum real value
    pub max: f32,
    /// Default real value
    pub default: f32,
}

impl ParameterRange {
    /// Create a new range. `default` is clamped into `[min, max]`.
    pub fn new(min: f32, max: f32, default: f32) -> Self {
        debug_assert!(max > min, "max must be greater than min");
        Self {
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    /// Clamp a real value into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Real value → normalized 0.0-1.0.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Normalized 0.0-1.0 → real value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_round_trip() {
        let range = ParameterRange::new(200.0, 1000.0, 500.0);
        assert_eq!(range.clamp(100.0), 200.0);
        assert_eq!(range.clamp(2000.0), 1000.0);
        let norm = range.normalize(600.0);
        assert!((range.denormalize(norm) - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_clamped_into_range() {
        let range = ParameterRange::new(0.0, 100.0, 150.0);
        assert_eq!(range.default, 100.0);
    }
}
