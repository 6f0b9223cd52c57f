//! Block-level effect shell: parameter pull, dry/wet mix, output gain.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;
use voxmorph_core::{AtomicFloat, Error, ParameterRange, ProcessSpec, Result};
use voxmorph_dsp::{
    SpectralProcessor, VisualizationHandle, DEFAULT_TARGET_FORMANTS_HZ, NUM_FORMANTS,
};

#[inline]
fn db_to_amplitude(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Lock-free parameter cells shared between the UI and audio threads.
///
/// The UI writes, the audio thread reads at block start; both sides are
/// wait-free. Values are clamped into their [`ParameterRange`] on write.
pub struct MorphParams {
    formants_hz: [AtomicFloat; NUM_FORMANTS],
    mix_percent: AtomicFloat,
    output_gain_db: AtomicFloat,
}

impl MorphParams {
    fn new(formants_hz: &[f32; NUM_FORMANTS], mix_percent: f32, output_gain_db: f32) -> Self {
        Self {
            formants_hz: std::array::from_fn(|i| {
                AtomicFloat::new(Self::formant_range(i).clamp(formants_hz[i]))
            }),
            mix_percent: AtomicFloat::new(Self::mix_range().clamp(mix_percent)),
            output_gain_db: AtomicFloat::new(Self::output_gain_range().clamp(output_gain_db)),
        }
    }

    /// Host-facing range for the formant at `index`. The low formants get
    /// tighter ranges matching their vocal register.
    pub fn formant_range(index: usize) -> ParameterRange {
        debug_assert!(index < NUM_FORMANTS);
        match index {
            0 => ParameterRange::new(200.0, 1000.0, DEFAULT_TARGET_FORMANTS_HZ[0]),
            1 => ParameterRange::new(800.0, 3500.0, DEFAULT_TARGET_FORMANTS_HZ[1]),
            _ => ParameterRange::new(500.0, 12_000.0, DEFAULT_TARGET_FORMANTS_HZ[index]),
        }
    }

    /// Dry/wet mix range in percent: 0 = fully dry, 100 = fully wet.
    pub fn mix_range() -> ParameterRange {
        ParameterRange::new(0.0, 100.0, 100.0)
    }

    /// Output gain range in dB.
    pub fn output_gain_range() -> ParameterRange {
        ParameterRange::new(-24.0, 6.0, 0.0)
    }

    pub fn set_formant_hz(&self, index: usize, hz: f32) {
        if let Some(cell) = self.formants_hz.get(index) {
            cell.set(Self::formant_range(index).clamp(hz));
        }
    }

    pub fn formant_hz(&self, index: usize) -> f32 {
        self.formants_hz.get(index).map_or(0.0, AtomicFloat::get)
    }

    pub fn set_mix_percent(&self, percent: f32) {
        self.mix_percent.set(Self::mix_range().clamp(percent));
    }

    pub fn mix_percent(&self) -> f32 {
        self.mix_percent.get()
    }

    pub fn set_output_gain_db(&self, db: f32) {
        self.output_gain_db.set(Self::output_gain_range().clamp(db));
    }

    pub fn output_gain_db(&self) -> f32 {
        self.output_gain_db.get()
    }

    fn collect_formants(&self, out: &mut [f32; NUM_FORMANTS]) {
        for (slot, cell) in out.iter_mut().zip(self.formants_hz.iter()) {
            *slot = cell.get_relaxed();
        }
    }
}

/// Per-block driver around the [`SpectralProcessor`].
///
/// Owns the processor and a dry buffer; every block it pulls the current
/// targets from [`MorphParams`], runs the wet path, and applies
/// `tanh((dry * (1 - mix) + wet * mix) * gain)` per sample.
pub struct FormantMorpher {
    processor: SpectralProcessor,
    params: Arc<MorphParams>,
    dry: Vec<Vec<f32>>,
    target_scratch: [f32; NUM_FORMANTS],
}

impl FormantMorpher {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> FormantMorpherBuilder {
        FormantMorpherBuilder::default()
    }

    /// The shared parameter cells. Clone the `Arc` onto the UI thread.
    pub fn params(&self) -> Arc<MorphParams> {
        Arc::clone(&self.params)
    }

    /// Cloneable handle for UI-thread snapshot reads.
    pub fn visualization(&self) -> VisualizationHandle {
        self.processor.visualization()
    }

    /// Prepare the processor and size the dry buffer. Idempotent.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.processor.prepare(spec);
        self.params.collect_formants(&mut self.target_scratch);
        self.processor.set_target_formants_hz(&self.target_scratch);

        self.dry
            .resize_with(spec.num_channels, || vec![0.0; spec.max_block_size]);
        for ch in self.dry.iter_mut() {
            if ch.len() < spec.max_block_size {
                ch.resize(spec.max_block_size, 0.0);
            }
        }
        debug!(num_channels = spec.num_channels, "prepared formant morpher");
    }

    /// Flush buffered audio; parameters are kept.
    pub fn reset(&mut self) {
        self.processor.reset();
    }

    /// Audio-thread entry: process `num_samples` of every channel in
    /// place. Channels beyond those seen at `prepare` are ignored.
    pub fn process(&mut self, channels: &mut [&mut [f32]], num_samples: usize) {
        if channels.is_empty() || num_samples == 0 {
            return;
        }

        // Parameter pull: takes effect from the next analysis frame.
        self.params.collect_formants(&mut self.target_scratch);
        self.processor.set_target_formants_hz(&self.target_scratch);
        let mix = (self.params.mix_percent.get_relaxed() / 100.0).clamp(0.0, 1.0);
        let gain = db_to_amplitude(self.params.output_gain_db.get_relaxed());

        let active = channels.len().min(self.dry.len());
        if active == 0 {
            return;
        }

        for (dry, ch) in self.dry.iter_mut().zip(channels.iter()) {
            dry[..num_samples].copy_from_slice(&ch[..num_samples]);
        }

        {
            let dry_refs: SmallVec<[&[f32]; 2]> = self
                .dry
                .iter()
                .take(active)
                .map(|d| &d[..num_samples])
                .collect();
            self.processor
                .process(&dry_refs, &mut channels[..active], num_samples);
        }

        for (ch, dry) in channels.iter_mut().zip(self.dry.iter()) {
            for (sample, &d) in ch[..num_samples].iter_mut().zip(dry[..num_samples].iter()) {
                let mixed = d * (1.0 - mix) + *sample * mix;
                // Safety soft clip against extreme envelope gains.
                *sample = (mixed * gain).tanh();
            }
        }
    }

    /// Estimate formants from a reference buffer and apply them as the
    /// new targets, both to the parameter cells and the processor.
    ///
    /// Not real-time. Returns the estimated frequencies, or
    /// [`Error::EmptyBuffer`] when there is nothing to analyse.
    pub fn estimate_and_apply(
        &mut self,
        buffer: &[f32],
        source_sample_rate: f64,
    ) -> Result<[f32; NUM_FORMANTS]> {
        if buffer.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        let estimated = self
            .processor
            .estimate_formants_from_buffer(buffer, source_sample_rate);
        for (i, &hz) in estimated.iter().enumerate() {
            self.params.set_formant_hz(i, hz);
        }
        self.processor.set_target_formants_hz(&estimated);
        Ok(estimated)
    }
}

impl Default for FormantMorpher {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`FormantMorpher`] with fluent API.
#[derive(Clone, Debug)]
pub struct FormantMorpherBuilder {
    target_formants_hz: [f32; NUM_FORMANTS],
    mix_percent: f32,
    output_gain_db: f32,
}

impl Default for FormantMorpherBuilder {
    fn default() -> Self {
        Self {
            target_formants_hz: DEFAULT_TARGET_FORMANTS_HZ,
            mix_percent: 100.0,
            output_gain_db: 0.0,
        }
    }
}

impl FormantMorpherBuilder {
    /// Initial target formants in Hz.
    pub fn target_formants_hz(mut self, targets: [f32; NUM_FORMANTS]) -> Self {
        self.target_formants_hz = targets;
        self
    }

    /// Dry/wet mix in percent (0 = dry, 100 = wet).
    pub fn mix_percent(mut self, percent: f32) -> Self {
        self.mix_percent = percent;
        self
    }

    /// Output gain in dB.
    pub fn output_gain_db(mut self, db: f32) -> Self {
        self.output_gain_db = db;
        self
    }

    /// Build the configured morpher.
    pub fn build(self) -> FormantMorpher {
        let params = Arc::new(MorphParams::new(
            &self.target_formants_hz,
            self.mix_percent,
            self.output_gain_db,
        ));
        let mut processor = SpectralProcessor::new();
        let mut targets = [0.0f32; NUM_FORMANTS];
        params.collect_formants(&mut targets);
        processor.set_target_formants_hz(&targets);

        FormantMorpher {
            processor,
            params,
            dry: Vec::new(),
            target_scratch: [0.0; NUM_FORMANTS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_clamp_to_range() {
        let params = MorphParams::new(&DEFAULT_TARGET_FORMANTS_HZ, 100.0, 0.0);
        params.set_formant_hz(0, 50.0);
        assert_eq!(params.formant_hz(0), 200.0);
        params.set_formant_hz(0, 5_000.0);
        assert_eq!(params.formant_hz(0), 1_000.0);
        params.set_mix_percent(150.0);
        assert_eq!(params.mix_percent(), 100.0);
        params.set_output_gain_db(20.0);
        assert_eq!(params.output_gain_db(), 6.0);
    }

    #[test]
    fn test_builder_applies_settings() {
        let morpher = FormantMorpher::builder()
            .mix_percent(25.0)
            .output_gain_db(-6.0)
            .build();
        let params = morpher.params();
        assert_eq!(params.mix_percent(), 25.0);
        assert_eq!(params.output_gain_db(), -6.0);
    }

    #[test]
    fn test_estimate_and_apply_rejects_empty_buffer() {
        let mut morpher = FormantMorpher::new();
        let spec = ProcessSpec::new(48_000.0, 512, 2).unwrap();
        morpher.prepare(&spec);

        let before = morpher.params().formant_hz(0);
        let result = morpher.estimate_and_apply(&[], 48_000.0);
        assert!(matches!(result, Err(Error::EmptyBuffer)));
        assert_eq!(morpher.params().formant_hz(0), before);
    }

    #[test]
    fn test_out_of_range_formant_index_is_ignored() {
        let params = MorphParams::new(&DEFAULT_TARGET_FORMANTS_HZ, 100.0, 0.0);
        params.set_formant_hz(NUM_FORMANTS, 1_000.0);
        assert_eq!(params.formant_hz(NUM_FORMANTS), 0.0);
    }
}
