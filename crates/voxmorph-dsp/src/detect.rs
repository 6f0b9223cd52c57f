//! Formant detection: peak picking on the smooth spectral envelope.

use crate::NUM_FORMANTS;

/// Peaks below this frequency are ignored.
const DETECT_MIN_HZ: f32 = 150.0;

/// Peaks above this frequency are ignored.
const DETECT_MAX_HZ: f32 = 9000.0;

/// Minimum spacing between two selected peaks.
const DETECT_SEPARATION_HZ: f32 = 120.0;

#[derive(Debug, Clone, Copy)]
struct Peak {
    bin: usize,
    mag: f32,
}

/// Picks exactly [`NUM_FORMANTS`] ascending envelope peaks per frame.
///
/// The output is always fully populated and monotone, even on silent or
/// near-flat envelopes, so downstream warp-node construction stays valid.
/// Scratch buffers are preallocated; `detect` is safe on the audio thread.
pub struct FormantDetector {
    candidates: Vec<Peak>,
    selected: Vec<usize>,
}

impl FormantDetector {
    pub fn new(num_bins: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(num_bins),
            selected: Vec::with_capacity(NUM_FORMANTS),
        }
    }

    /// Scan `envelope` (a half-spectrum) and write ascending formant bin
    /// indices into `formant_bins`.
    pub fn detect(
        &mut self,
        envelope: &[f32],
        sample_rate: f64,
        formant_bins: &mut [f32; NUM_FORMANTS],
    ) {
        let fft_size = (envelope.len() - 1) * 2;
        let hz_per_bin = (sample_rate / fft_size as f64) as f32;
        let min_bin = ((DETECT_MIN_HZ / hz_per_bin) as usize).max(1);
        let max_bin = ((DETECT_MAX_HZ / hz_per_bin) as usize).min(envelope.len() - 2);
        let min_distance = ((DETECT_SEPARATION_HZ / hz_per_bin) as usize).max(2);

        self.candidates.clear();
        for i in min_bin..=max_bin {
            if envelope[i] > envelope[i - 1] && envelope[i] >= envelope[i + 1] {
                self.candidates.push(Peak {
                    bin: i,
                    mag: envelope[i],
                });
            }
        }

        // Strongest first; in-place sort keeps the audio thread
        // allocation-free.
        self.candidates
            .sort_unstable_by(|a, b| b.mag.total_cmp(&a.mag));

        self.selected.clear();
        for peak in &self.candidates {
            if self
                .selected
                .iter()
                .any(|&chosen| chosen.abs_diff(peak.bin) < min_distance)
            {
                continue;
            }
            self.selected.push(peak.bin);
            if self.selected.len() == NUM_FORMANTS {
                break;
            }
        }
        self.selected.sort_unstable();

        // Pad to a full set by walking forward from the last chosen bin.
        let mut last = min_bin;
        for (i, slot) in formant_bins.iter_mut().enumerate() {
            let bin = match self.selected.get(i) {
                Some(&chosen) => chosen,
                None => (last + min_distance).min(max_bin),
            };
            let bin = bin.clamp(min_bin, max_bin);
            *slot = bin as f32;
            last = bin;
        }
    }
}
