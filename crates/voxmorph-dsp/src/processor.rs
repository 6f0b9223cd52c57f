//! The spectral processing core.
//!
//! Streams samples through an STFT at 75% overlap, separates excitation
//! from the vocal-tract envelope per frame, warps the envelope so the
//! detected formants land on the configured targets, and resynthesizes by
//! multiplying each bin with a real scale factor, which leaves phase (and
//! therefore pitch) untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use voxmorph_core::ProcessSpec;

use crate::detect::FormantDetector;
use crate::envelope::EnvelopeExtractor;
use crate::fft::RealFft;
use crate::snapshot::{VisualizationData, VisualizationHandle};
use crate::warp::{FormantWarper, WarpingPoint};
use crate::window::HannWindow;
use crate::{FFT_SIZE, HOP_SIZE, NUM_BINS, NUM_FORMANTS};

/// Hann-squared overlap sum at 75% overlap; folds into the resynthesis
/// normalization together with the unnormalized inverse FFT.
const OVERLAP_ADD_SUM: f32 = 1.5;

/// Ceiling on the per-bin envelope substitution gain.
const MAX_ENVELOPE_GAIN_DB: f32 = 24.0;

/// The extracted envelope is floored here before division.
const ENV_FLOOR: f32 = 1e-7;

/// The warped envelope is floored here before division.
const WARPED_FLOOR: f32 = 1e-9;

/// Lowest admissible first target formant.
const MIN_FORMANT_HZ: f32 = 200.0;

/// Minimum spacing enforced between successive target formants.
const MIN_FORMANT_SEPARATION_HZ: f32 = 20.0;

/// Neutral target formants, roughly evenly spread over the vocal range.
pub const DEFAULT_TARGET_FORMANTS_HZ: [f32; NUM_FORMANTS] = [
    500.0, 1500.0, 2500.0, 3200.0, 3800.0, 4400.0, 5000.0, 5600.0, 6200.0, 6800.0, 7400.0,
    8000.0, 8600.0, 9200.0, 9800.0,
];

/// Real-time formant morphing processor.
///
/// Construction allocates every buffer for the fixed FFT size; `prepare`
/// binds a sample rate and `process` then runs allocation-free and
/// lock-free (the snapshot publish is a failable `try_lock`).
///
/// Channel 0 is the analysed channel; the processed result is copied to
/// every output channel.
pub struct SpectralProcessor {
    sample_rate: f64,
    prepared: bool,

    fft: RealFft,
    window: HannWindow,
    envelope_extractor: EnvelopeExtractor,
    warper: FormantWarper,
    detector: FormantDetector,

    // Streaming state: two rings with mod-N read/write indices.
    input_ring: Vec<f32>,
    output_ring: Vec<f32>,
    input_write_pos: usize,
    output_read_pos: usize,
    hop_counter: usize,

    // Per-frame scratch, reused across hops.
    frame: Vec<f32>,
    fft_buffer: Vec<f32>,
    magnitude: Vec<f32>,
    envelope: Vec<f32>,
    warped: Vec<f32>,
    warp_points: Vec<WarpingPoint>,

    target_formants_hz: [f32; NUM_FORMANTS],
    current_formant_bins: [f32; NUM_FORMANTS],

    vis_slot: Arc<Mutex<VisualizationData>>,
}

impl SpectralProcessor {
    pub fn new() -> Self {
        Self {
            sample_rate: 44_100.0,
            prepared: false,
            fft: RealFft::new(FFT_SIZE),
            window: HannWindow::new(FFT_SIZE),
            envelope_extractor: EnvelopeExtractor::new(FFT_SIZE),
            warper: FormantWarper::with_capacity(NUM_BINS, NUM_FORMANTS + 2),
            detector: FormantDetector::new(NUM_BINS),
            input_ring: vec![0.0; FFT_SIZE],
            output_ring: vec![0.0; FFT_SIZE],
            input_write_pos: 0,
            output_read_pos: 0,
            hop_counter: 0,
            frame: vec![0.0; FFT_SIZE],
            fft_buffer: vec![0.0; FFT_SIZE * 2],
            magnitude: vec![0.0; NUM_BINS],
            envelope: vec![0.0; NUM_BINS],
            warped: vec![0.0; NUM_BINS],
            warp_points: Vec::with_capacity(NUM_FORMANTS + 2),
            target_formants_hz: DEFAULT_TARGET_FORMANTS_HZ,
            current_formant_bins: [0.0; NUM_FORMANTS],
            vis_slot: Arc::new(Mutex::new(VisualizationData::new())),
        }
    }

    /// Bind a sample rate and flush streaming state. Idempotent; all
    /// buffers were already sized at construction.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.prepared = true;
        self.reset();
        debug!(
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            num_channels = spec.num_channels,
            "prepared spectral processor"
        );
    }

    /// Zero the rings and hop counter; FFT and window tables are kept.
    pub fn reset(&mut self) {
        self.input_ring.fill(0.0);
        self.output_ring.fill(0.0);
        self.input_write_pos = 0;
        self.output_read_pos = 0;
        self.hop_counter = 0;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Replace the target formants, enforcing the monotone floor: the
    /// first target is at least 200 Hz and each successive one at least
    /// 20 Hz above its predecessor. Wait-free; called per block from the
    /// audio thread.
    pub fn set_target_formants_hz(&mut self, targets: &[f32; NUM_FORMANTS]) {
        self.target_formants_hz = *targets;
        let mut floor = MIN_FORMANT_HZ;
        for target in self.target_formants_hz.iter_mut() {
            *target = target.max(floor);
            floor = *target + MIN_FORMANT_SEPARATION_HZ;
        }
    }

    pub fn target_formants_hz(&self) -> [f32; NUM_FORMANTS] {
        self.target_formants_hz
    }

    /// Source formant bins detected in the most recent frame.
    pub fn current_formant_bins(&self) -> [f32; NUM_FORMANTS] {
        self.current_formant_bins
    }

    /// Audio-thread entry point. One output sample leaves per input
    /// sample; latency is one FFT frame.
    ///
    /// Channel 0 of `input` is analysed and the result written to every
    /// channel of `output`. Before `prepare` this is a pass-through.
    pub fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        num_samples: usize,
    ) {
        if input.is_empty() || output.is_empty() || num_samples == 0 {
            return;
        }

        if !self.prepared {
            for (ch, out) in output.iter_mut().enumerate() {
                let src = input[ch.min(input.len() - 1)];
                out[..num_samples].copy_from_slice(&src[..num_samples]);
            }
            return;
        }

        let src = input[0];
        debug_assert!(src.len() >= num_samples);
        debug_assert!(output[0].len() >= num_samples);

        for i in 0..num_samples {
            self.input_ring[self.input_write_pos] = src[i];
            self.input_write_pos = (self.input_write_pos + 1) % FFT_SIZE;

            output[0][i] = self.output_ring[self.output_read_pos];
            self.output_ring[self.output_read_pos] = 0.0;
            self.output_read_pos = (self.output_read_pos + 1) % FFT_SIZE;

            self.hop_counter += 1;
            if self.hop_counter >= HOP_SIZE {
                self.hop_counter = 0;

                // Assemble the latest FFT_SIZE samples, oldest first.
                for k in 0..FFT_SIZE {
                    self.frame[k] = self.input_ring[(self.input_write_pos + k) % FFT_SIZE];
                }

                self.process_frame();

                // Overlap-add, aligned with the read pointer.
                for k in 0..FFT_SIZE {
                    let pos = (self.output_read_pos + k) % FFT_SIZE;
                    self.output_ring[pos] += self.frame[k];
                }
            }
        }

        if let Some((first, rest)) = output.split_first_mut() {
            for ch in rest {
                ch[..num_samples].copy_from_slice(&first[..num_samples]);
            }
        }
    }

    /// One frame of analysis, envelope substitution, and resynthesis.
    /// `self.frame` holds the time-domain input on entry and the windowed
    /// output ready for overlap-add on exit.
    fn process_frame(&mut self) {
        self.window.apply(&mut self.frame);

        self.fft_buffer[..FFT_SIZE].copy_from_slice(&self.frame);
        self.fft_buffer[FFT_SIZE..].fill(0.0);
        self.fft.forward(&mut self.fft_buffer);

        for k in 0..NUM_BINS {
            let re = self.fft_buffer[2 * k];
            let im = self.fft_buffer[2 * k + 1];
            self.magnitude[k] = (re * re + im * im).sqrt();
        }

        self.envelope_extractor
            .process(&self.magnitude, &mut self.envelope);

        self.detector.detect(
            &self.envelope,
            self.sample_rate,
            &mut self.current_formant_bins,
        );

        self.build_warp_points();
        self.warper.calculate_warp_map(NUM_BINS, &self.warp_points);
        self.warper.process(&self.envelope, &mut self.warped);

        // Publish for the UI; a missed hop is fine, the next one lands.
        if let Some(mut vis) = self.vis_slot.try_lock() {
            vis.spectrum.copy_from_slice(&self.magnitude);
            vis.envelope.copy_from_slice(&self.warped);
            vis.f1_bin = self.warp_points[1].dst_bin;
            vis.f2_bin = self.warp_points[2].dst_bin;
        }

        // Envelope substitution with a real per-bin scale: phase carries
        // straight through.
        let max_gain = 10.0f32.powf(MAX_ENVELOPE_GAIN_DB / 20.0);
        for k in 0..NUM_BINS {
            let original = self.envelope[k].max(ENV_FLOOR);
            let warped = self.warped[k].max(WARPED_FLOOR);
            let scale = (warped / original).clamp(0.0, max_gain);
            self.fft_buffer[2 * k] *= scale;
            self.fft_buffer[2 * k + 1] *= scale;
        }

        self.fft.inverse(&mut self.fft_buffer);

        // The inverse FFT leaves the factor of FFT_SIZE in; fold it into
        // the Hann-squared overlap gain.
        let norm = 1.0 / (FFT_SIZE as f32 * OVERLAP_ADD_SUM);
        for (slot, &sample) in self.frame.iter_mut().zip(self.fft_buffer.iter()) {
            *slot = sample * norm;
        }

        self.window.apply(&mut self.frame);
    }

    /// Anchor node, one node per formant with strictly increasing
    /// destinations, end anchor.
    fn build_warp_points(&mut self) {
        self.warp_points.clear();
        self.warp_points.push(WarpingPoint {
            src_bin: 0.0,
            dst_bin: 0.0,
        });

        let hz_per_bin = ((self.sample_rate / FFT_SIZE as f64) as f32).max(1.0);
        let mut last_dst = 0.0f32;
        for i in 0..NUM_FORMANTS {
            let target_bin = self.target_formants_hz[i] / hz_per_bin;
            let dst = target_bin
                .max(last_dst + 1.0)
                .min((NUM_BINS - 2) as f32);
            self.warp_points.push(WarpingPoint {
                src_bin: self.current_formant_bins[i],
                dst_bin: dst,
            });
            last_dst = dst;
        }

        self.warp_points.push(WarpingPoint {
            src_bin: (NUM_BINS - 1) as f32,
            dst_bin: (NUM_BINS - 1) as f32,
        });
    }

    /// Estimate formant frequencies from one window centered in a
    /// reference buffer, using that buffer's own sample rate.
    ///
    /// Not real-time: it borrows the per-frame scratch, so the `&mut`
    /// receiver keeps it mutually exclusive with `process` by
    /// construction. An empty buffer returns the current targets
    /// unchanged.
    pub fn estimate_formants_from_buffer(
        &mut self,
        buffer: &[f32],
        source_sample_rate: f64,
    ) -> [f32; NUM_FORMANTS] {
        if buffer.is_empty() || source_sample_rate <= 0.0 {
            warn!("empty reference buffer, keeping current targets");
            return self.target_formants_hz;
        }

        self.frame.fill(0.0);
        let start = (buffer.len() / 2).saturating_sub(FFT_SIZE / 2);
        let count = FFT_SIZE.min(buffer.len() - start);
        self.frame[..count].copy_from_slice(&buffer[start..start + count]);

        self.window.apply(&mut self.frame);

        self.fft_buffer[..FFT_SIZE].copy_from_slice(&self.frame);
        self.fft_buffer[FFT_SIZE..].fill(0.0);
        self.fft.forward(&mut self.fft_buffer);

        for k in 0..NUM_BINS {
            let re = self.fft_buffer[2 * k];
            let im = self.fft_buffer[2 * k + 1];
            self.magnitude[k] = (re * re + im * im).sqrt();
        }

        self.envelope_extractor
            .process(&self.magnitude, &mut self.envelope);

        let mut bins = [0.0f32; NUM_FORMANTS];
        self.detector
            .detect(&self.envelope, source_sample_rate, &mut bins);

        let hz_per_bin = (source_sample_rate / FFT_SIZE as f64) as f32;
        let mut estimated = [0.0f32; NUM_FORMANTS];
        for (hz, &bin) in estimated.iter_mut().zip(bins.iter()) {
            *hz = bin * hz_per_bin;
        }
        debug!(?estimated, "estimated formants from reference buffer");
        estimated
    }

    /// Cloneable handle for UI-thread snapshot reads.
    pub fn visualization(&self) -> VisualizationHandle {
        VisualizationHandle::new(Arc::clone(&self.vis_slot))
    }

    /// Blocking snapshot read into a caller-owned buffer.
    pub fn latest_visualization_data(&self, out: &mut VisualizationData) {
        self.visualization().read_into(out);
    }
}

impl Default for SpectralProcessor {
    fn default() -> Self {
        Self::new()
    }
}
