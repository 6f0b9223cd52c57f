//! Visualization snapshot shared between the audio and UI threads.
//!
//! Single-slot, single-writer, single-reader: the audio thread publishes
//! with a non-blocking `try_lock` after every hop and drops the update on
//! contention; the UI thread reads with a blocking lock at its own rate.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::NUM_BINS;

/// Latest spectral render: magnitude spectrum, warped envelope, and the
/// first two warp destinations as fractional bins.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VisualizationData {
    pub spectrum: Vec<f32>,
    pub envelope: Vec<f32>,
    pub f1_bin: f32,
    pub f2_bin: f32,
}

impl VisualizationData {
    pub fn new() -> Self {
        Self {
            spectrum: vec![0.0; NUM_BINS],
            envelope: vec![0.0; NUM_BINS],
            f1_bin: 0.0,
            f2_bin: 0.0,
        }
    }
}

impl Default for VisualizationData {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable UI-side reader for the latest snapshot.
#[derive(Clone)]
pub struct VisualizationHandle {
    slot: Arc<Mutex<VisualizationData>>,
}

impl VisualizationHandle {
    pub(crate) fn new(slot: Arc<Mutex<VisualizationData>>) -> Self {
        Self { slot }
    }

    /// Copy the latest snapshot into `out`. Blocks only for the duration
    /// of the writer's copy, which is bounded and short.
    pub fn read_into(&self, out: &mut VisualizationData) {
        let slot = self.slot.lock();
        out.spectrum.resize(slot.spectrum.len(), 0.0);
        out.spectrum.copy_from_slice(&slot.spectrum);
        out.envelope.resize(slot.envelope.len(), 0.0);
        out.envelope.copy_from_slice(&slot.envelope);
        out.f1_bin = slot.f1_bin;
        out.f2_bin = slot.f2_bin;
    }

    /// Clone the latest snapshot. Convenient for UI code that does not
    /// keep a reusable buffer.
    pub fn latest(&self) -> VisualizationData {
        self.slot.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_reads_published_data() {
        let slot = Arc::new(Mutex::new(VisualizationData::new()));
        let handle = VisualizationHandle::new(Arc::clone(&slot));

        {
            let mut writer = slot.try_lock().expect("uncontended slot");
            writer.spectrum[3] = 0.5;
            writer.f1_bin = 10.5;
        }

        let mut out = VisualizationData::new();
        handle.read_into(&mut out);
        assert_eq!(out.spectrum[3], 0.5);
        assert_eq!(out.f1_bin, 10.5);

        let cloned = handle.latest();
        assert_eq!(cloned.spectrum[3], 0.5);
    }
}
