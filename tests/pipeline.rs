//! End-to-end tests of the spectral processing pipeline.

mod helpers;

use helpers::tolerances::{RMS_DRIFT_DB, SILENCE_THRESHOLD};
use helpers::*;
use voxmorph::SpectralProcessor;

/// Silence in, silence out: no residue and no NaNs from the envelope
/// division guards.
#[test]
fn test_silence_passes_through_silently() {
    let mut processor = prepared_processor();
    let output = run_mono(&mut processor, &generate_silence(4096));
    assert_finite(&output);
    assert_silence(&output, SILENCE_THRESHOLD);
}

/// With targets set to the formants detected in the signal itself, the
/// warp is close to identity and the pipeline preserves level: output RMS
/// within ±3 dB of input RMS over one second of noise.
#[test]
fn test_identity_targets_preserve_noise_level() {
    let mut processor = prepared_processor();
    let noise = generate_noise(TEST_SAMPLE_RATE as usize, 0x5eed);

    let estimated = processor.estimate_formants_from_buffer(&noise, TEST_SAMPLE_RATE);
    processor.set_target_formants_hz(&estimated);

    let output = run_mono(&mut processor, &noise);
    assert_finite(&output);

    let in_rms = rms(&noise);
    let out_rms = rms(&output);
    let drift_db = 20.0 * (out_rms / in_rms).log10();
    assert!(
        drift_db.abs() <= RMS_DRIFT_DB,
        "RMS drift {drift_db:.2} dB (in {in_rms:.4}, out {out_rms:.4})"
    );
}

/// Output must stay finite for any finite input, including a full-scale
/// alternating square wave.
#[test]
fn test_harsh_input_stays_finite() {
    let mut processor = prepared_processor();
    let square: Vec<f32> = (0..TEST_SAMPLE_RATE as usize / 2)
        .map(|i| if (i / 32) % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    let output = run_mono(&mut processor, &square);
    assert_finite(&output);
}

/// Channel 0 is analysed; the result is copied to all output channels.
#[test]
fn test_stereo_channels_carry_identical_output() {
    let mut processor = prepared_processor();
    let left_in = generate_sine(440.0, TEST_SAMPLE_RATE, 2048);
    let right_in = generate_sine(880.0, TEST_SAMPLE_RATE, 2048);

    let mut left = vec![0.0f32; 2048];
    let mut right = vec![0.0f32; 2048];
    for start in (0..2048).step_by(TEST_BLOCK_SIZE) {
        let end = start + TEST_BLOCK_SIZE;
        processor.process(
            &[&left_in[start..end], &right_in[start..end]],
            &mut [&mut left[start..end], &mut right[start..end]],
            TEST_BLOCK_SIZE,
        );
    }

    assert_eq!(left, right);
}

/// Without prepare, process is a straight pass-through.
#[test]
fn test_unprepared_processor_passes_audio_through() {
    let mut processor = SpectralProcessor::new();
    let input = generate_sine(440.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let mut output = vec![0.0f32; TEST_BLOCK_SIZE];
    processor.process(&[&input[..]], &mut [&mut output[..]], TEST_BLOCK_SIZE);
    assert_eq!(output, input);
}

/// The offline estimator locates a lone sinusoid and returns a full
/// ascending formant set.
#[test]
fn test_estimator_locates_sinusoid() {
    let mut processor = prepared_processor();
    let reference = generate_sine(440.0, TEST_SAMPLE_RATE, 8192);

    let estimated = processor.estimate_formants_from_buffer(&reference, TEST_SAMPLE_RATE);

    let hz_per_bin = (TEST_SAMPLE_RATE / 1024.0) as f32;
    assert!(
        (estimated[0] - 440.0).abs() <= 2.0 * hz_per_bin,
        "first formant {} not near 440 Hz",
        estimated[0]
    );
    for pair in estimated.windows(2) {
        assert!(pair[1] >= pair[0], "formants must ascend: {estimated:?}");
    }
}

/// Snapshot reads see data after processing, through a cloned handle.
#[test]
fn test_visualization_handle_sees_updates() {
    let mut processor = prepared_processor();
    let handle = processor.visualization();

    let input = generate_sine(440.0, TEST_SAMPLE_RATE, 2048);
    let _ = run_mono(&mut processor, &input);

    let snapshot = handle.latest();
    assert!(snapshot.spectrum.iter().any(|&m| m > 0.0));
    assert!(snapshot.envelope.iter().all(|&e| e.is_finite()));
    assert!(snapshot.f2_bin > snapshot.f1_bin);
}
