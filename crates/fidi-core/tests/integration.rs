//! Integration tests for fidi-core.
//!
//! Drives the full block loop through [`Compressor`] and checks signal-level
//! behavior: steady-state gain, parallel mix extremes, stereo linking,
//! parameter changes through the shared store and meter hand-off between
//! threads.

use std::sync::Arc;
use std::thread;

use fidi_core::{
    Coefficients, Compressor, CompressorParams, EngineConfig, EnvelopeDomain, GainComputer,
    GainReductionMeter, KneeCurve, ParamIndex, ParamStore, db_to_linear, linear_to_db,
};

const SAMPLE_RATE: f64 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

/// Generate a sine wave buffer at the given frequency and amplitude.
fn generate_sine(freq_hz: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| amplitude * libm::sinf(TAU * freq_hz * n as f32 / SAMPLE_RATE as f32))
        .collect()
}

fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()))
}

fn build(
    params: &CompressorParams,
    config: EngineConfig,
) -> (Compressor, Arc<ParamStore>, Arc<GainReductionMeter>) {
    let store = Arc::new(ParamStore::from_params(params));
    let meter = Arc::new(GainReductionMeter::new());
    let mut comp = Compressor::new(Arc::clone(&store), Arc::clone(&meter), config);
    comp.prepare(SAMPLE_RATE);
    (comp, store, meter)
}

/// Run a constant-level stereo signal through in 512-frame blocks.
fn run_constant(comp: &mut Compressor, level: f32, frames: usize) -> (Vec<f32>, Vec<f32>) {
    let mut left = vec![level; frames];
    let mut right = vec![level; frames];
    for (l, r) in left.chunks_mut(512).zip(right.chunks_mut(512)) {
        comp.process_stereo_in_place(l, r);
    }
    (left, right)
}

// ============================================================================
// 1. Steady-state gain
// ============================================================================

#[test]
fn steady_state_hard_knee_reduction() {
    let params = CompressorParams {
        threshold_db: -20.0,
        ratio: 4.0,
        knee_db: 0.0,
        ..CompressorParams::default()
    };
    for domain in [EnvelopeDomain::Decibel, EnvelopeDomain::Linear] {
        let (mut comp, _, meter) =
            build(&params, EngineConfig::default().with_envelope_domain(domain));
        let level = db_to_linear(-10.0);
        let (left, _) = run_constant(&mut comp, level, 48000);

        let gain = left[47999] / level;
        assert!((gain - 0.4217).abs() < 1e-3, "{domain}: gain {gain}");
        assert!((linear_to_db(left[47999]) - (-17.5)).abs() < 0.02);
        // The envelope rises monotonically, so the deepest reading is the last.
        assert!((meter.take_reduction_db() - 7.5).abs() < 0.05);
    }
}

#[test]
fn signal_below_threshold_is_untouched() {
    let (mut comp, _, meter) = build(&CompressorParams::default(), EngineConfig::default());
    let input = generate_sine(440.0, db_to_linear(-30.0), 4800);
    let mut left = input.clone();
    let mut right = input.clone();
    let min_gain = comp.process_stereo_in_place(&mut left, &mut right);
    assert_eq!(min_gain, 1.0);
    assert_eq!(left, input);
    assert_eq!(meter.take(), 1.0);
}

#[test]
fn every_configuration_reaches_same_steady_state() {
    let params = CompressorParams {
        threshold_db: -24.0,
        ratio: 3.0,
        knee_db: 0.0,
        ..CompressorParams::default()
    };
    let mut gains = Vec::new();
    for domain in [EnvelopeDomain::Decibel, EnvelopeDomain::Linear] {
        for interval in [1, 16, 64] {
            let config = EngineConfig::default()
                .with_envelope_domain(domain)
                .with_smoothing_interval(interval);
            let (mut comp, _, _) = build(&params, config);
            let (left, _) = run_constant(&mut comp, 0.5, 48000);
            gains.push(left[47999]);
        }
    }
    for pair in gains.windows(2) {
        assert!((pair[0] - pair[1]).abs() < 1e-4, "{gains:?}");
    }
}

#[test]
fn knee_curves_agree_outside_the_knee() {
    let params = CompressorParams {
        threshold_db: -30.0,
        ratio: 6.0,
        knee_db: 10.0,
        ..CompressorParams::default()
    };
    let mut outputs = Vec::new();
    for curve in KneeCurve::ALL {
        let (mut comp, _, _) = build(&params, EngineConfig::default().with_knee_curve(curve));
        // -6 dBFS is far above the upper knee edge (-25 dB).
        let (left, _) = run_constant(&mut comp, 0.5, 48000);
        outputs.push(left[47999]);
    }
    assert!((outputs[0] - outputs[1]).abs() < 1e-5);
    assert!((outputs[0] - outputs[2]).abs() < 1e-5);
}

// ============================================================================
// 2. Parallel mix and makeup
// ============================================================================

#[test]
fn mix_zero_outputs_dry() {
    let params = CompressorParams {
        threshold_db: -40.0,
        ratio: 10.0,
        mix_percent: 0.0,
        ..CompressorParams::default()
    };
    let (mut comp, _, _) = build(&params, EngineConfig::default());
    let input = generate_sine(220.0, 0.8, 9600);
    let mut left = input.clone();
    let mut right = input.clone();
    let min_gain = comp.process_stereo_in_place(&mut left, &mut right);
    assert!(min_gain < 0.5, "compressor should still be working: {min_gain}");
    assert_eq!(left, input);
    assert_eq!(right, input);
}

#[test]
fn mix_full_outputs_input_times_gain_times_makeup() {
    let params = CompressorParams {
        threshold_db: -30.0,
        ratio: 5.0,
        makeup_db: 6.0,
        mix_percent: 100.0,
        ..CompressorParams::default()
    };
    let config = EngineConfig::default();
    let (mut comp, _, _) = build(&params, config);

    // A second engine fed the same level reproduces the gain sequence.
    let mut reference = GainComputer::new(config);
    reference.update(&Coefficients::new(SAMPLE_RATE), &params);
    reference.reset();

    let input = generate_sine(330.0, 0.7, 4800);
    let mut output = input.clone();
    comp.process_mono_in_place(&mut output);

    for (&x, &y) in input.iter().zip(output.iter()) {
        let gain = reference.compute_gain_reduction(x.abs());
        let expected = x * gain * reference.smoothed_makeup_linear();
        assert_eq!(y, expected);
    }
}

// ============================================================================
// 3. Stereo linking
// ============================================================================

#[test]
fn loud_left_silent_right_links_gain() {
    let params = CompressorParams {
        threshold_db: -20.0,
        ratio: 4.0,
        attack_ms: 1.0,
        ..CompressorParams::default()
    };
    let (mut stereo, _, _) = build(&params, EngineConfig::default());
    let (mut mono, _, _) = build(&params, EngineConfig::default());

    let level = db_to_linear(-6.0);
    let mut left = vec![level; 4800];
    let mut right = vec![0.0_f32; 4800];
    stereo.process_stereo_in_place(&mut left, &mut right);

    // Detection equals the left magnitude: same result as mono on the left.
    let mut mono_left = vec![level; 4800];
    mono.process_mono_in_place(&mut mono_left);
    assert_eq!(left, mono_left);
    assert!(left[4799] < level);

    // Silence times any gain stays silence.
    assert!(right.iter().all(|&s| s == 0.0));
}

#[test]
fn both_channels_receive_the_same_gain() {
    let params = CompressorParams {
        threshold_db: -30.0,
        ..CompressorParams::default()
    };
    let (mut comp, _, _) = build(&params, EngineConfig::default());
    let left_in = generate_sine(100.0, 0.9, 4800);
    let right_in = generate_sine(1000.0, 0.3, 4800);
    let mut left = left_in.clone();
    let mut right = right_in.clone();
    comp.process_stereo_in_place(&mut left, &mut right);

    for i in (0..4800).step_by(7) {
        if left_in[i].abs() > 1e-3 && right_in[i].abs() > 1e-3 {
            let gain_l = left[i] / left_in[i];
            let gain_r = right[i] / right_in[i];
            assert!((gain_l - gain_r).abs() < 1e-5, "frame {i}: {gain_l} vs {gain_r}");
        }
    }
}

// ============================================================================
// 4. Live parameters and metering
// ============================================================================

#[test]
fn parameter_change_glides_without_jumps() {
    let (mut comp, store, _) = build(&CompressorParams::default(), EngineConfig::default());
    let (before, _) = run_constant(&mut comp, 0.5, 4800);

    store.set(ParamIndex::Makeup, 12.0);
    let (after, _) = run_constant(&mut comp, 0.5, 48000);

    // No step at the block boundary.
    let step = (after[0] - before[4799]).abs();
    assert!(step < 0.01, "step {step}");
    // Settles at +12 dB relative to before.
    let ratio = after[47999] / before[4799];
    assert!((linear_to_db(ratio) - 12.0).abs() < 0.05, "ratio {ratio}");
}

#[test]
fn reset_restores_initial_behavior() {
    let params = CompressorParams {
        threshold_db: -30.0,
        ..CompressorParams::default()
    };
    let (mut comp, _, _) = build(&params, EngineConfig::default());
    let (first, _) = run_constant(&mut comp, 0.8, 2048);
    comp.reset();
    let (second, _) = run_constant(&mut comp, 0.8, 2048);
    assert_eq!(first, second);
}

#[test]
fn meter_keeps_deepest_reduction_until_read() {
    let params = CompressorParams {
        threshold_db: -30.0,
        attack_ms: 0.5,
        release_ms: 50.0,
        ..CompressorParams::default()
    };
    let (mut comp, _, meter) = build(&params, EngineConfig::default());

    let (loud, _) = run_constant(&mut comp, 0.9, 4800);
    let (_quiet, _) = run_constant(&mut comp, 0.05, 4800);
    let deepest = meter.take();
    assert!(deepest < 0.5);
    assert!((deepest * 0.9 - peak(&loud[4000..])).abs() < 0.05);

    // Let the envelope fall well below the knee, then check nothing new arrives.
    run_constant(&mut comp, 0.001, 48000);
    meter.take();
    run_constant(&mut comp, 0.001, 4800);
    assert_eq!(meter.take(), 1.0);
}

#[test]
fn meter_consumed_from_another_thread() {
    let params = CompressorParams {
        threshold_db: -40.0,
        attack_ms: 0.1,
        ..CompressorParams::default()
    };
    let (mut comp, store, meter) = build(&params, EngineConfig::default());

    let reader_meter = Arc::clone(&meter);
    let reader = thread::spawn(move || {
        let mut deepest = 1.0_f32;
        for _ in 0..200 {
            deepest = deepest.min(reader_meter.take());
            thread::yield_now();
        }
        deepest
    });

    let writer_store = Arc::clone(&store);
    let writer = thread::spawn(move || {
        for i in 0..100 {
            writer_store.set(ParamIndex::Ratio, 2.0 + (i % 10) as f32);
            thread::yield_now();
        }
    });

    let mut block_min = 1.0_f32;
    for _ in 0..200 {
        let mut left = vec![0.9_f32; 256];
        let mut right = vec![-0.9_f32; 256];
        block_min = block_min.min(comp.process_stereo_in_place(&mut left, &mut right));
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    writer.join().expect("writer thread panicked");
    let seen = reader.join().expect("reader thread panicked");
    let remaining = meter.take();

    // Every published minimum was seen by the reader or is still pending.
    assert!(seen.min(remaining) <= block_min + 1e-6);
    assert!(seen >= block_min - 1e-6);
}
