//! Hann window table.

use std::f32::consts::PI;

/// Symmetric Hann window of fixed length, applied on both the analysis
/// and synthesis sides of the STFT.
pub struct HannWindow {
    table: Vec<f32>,
}

impl HannWindow {
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 1);
        let denom = (size - 1) as f32;
        let table = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect();
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Multiply a frame by the window in place.
    #[inline]
    pub fn apply(&self, frame: &mut [f32]) {
        debug_assert_eq!(frame.len(), self.table.len());
        for (sample, &w) in frame.iter_mut().zip(self.table.iter()) {
            *sample *= w;
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.table
    }
}
