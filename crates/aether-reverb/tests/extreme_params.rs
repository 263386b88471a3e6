//! Extreme parameter tests for the reverb engine.
//!
//! Verifies finite (non-NaN, non-Inf) output with every parameter at its
//! minimum and maximum, with out-of-range host values, and at extreme sample
//! rates (8 kHz and 192 kHz). The maximum case is also run with the drives
//! off, since their saturators would otherwise bound a runaway loop. Long-run
//! decay at maximum settings is pinned in `regression.rs`.

use aether_reverb::{AetherReverb, PARAMS, ParamId, ReverbParams};

const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
const LOW_SAMPLE_RATE: f32 = 8000.0;
const HIGH_SAMPLE_RATE: f32 = 192000.0;
const NUM_SAMPLES: usize = 48_000;

/// Process `NUM_SAMPLES` and assert every output is finite.
fn assert_finite_output(reverb: &mut AetherReverb, params: &ReverbParams, label: &str) {
    let input: Vec<f32> = (0..NUM_SAMPLES)
        .map(|i| match i % 3 {
            0 => 0.5,
            1 => -0.5,
            _ => 0.0,
        })
        .collect();
    let mut left = vec![0.0; NUM_SAMPLES];
    let mut right = vec![0.0; NUM_SAMPLES];
    let ports = params.ports();
    for start in (0..NUM_SAMPLES).step_by(500) {
        let end = start + 500;
        reverb.process(
            500,
            &ports,
            &input[start..end],
            &input[start..end],
            &mut left[start..end],
            &mut right[start..end],
        );
    }
    for (i, (l, r)) in left.iter().zip(&right).enumerate() {
        assert!(
            l.is_finite() && r.is_finite(),
            "{label}: non-finite output at sample {i}: ({l}, {r})"
        );
    }
}

fn all_params_at(pick: impl Fn(ParamId) -> f32) -> ReverbParams {
    let mut params = ReverbParams::default();
    for id in ParamId::ALL {
        params.set(id, pick(id));
    }
    params
}

fn run_extreme_test(sample_rate: f32, label: &str) {
    let min = all_params_at(|id| id.descriptor().min);
    let max = all_params_at(|id| id.descriptor().max);
    let undriven = all_params_at(|id| match id {
        ParamId::EarlyDiffusionDrive | ParamId::LateDiffusionDrive => id.descriptor().min,
        _ => id.descriptor().max,
    });

    // Prepared: components configured directly at the extremes
    for (params, which) in [(&min, "min"), (&max, "max"), (&undriven, "max undriven")] {
        let mut reverb = AetherReverb::new(sample_rate);
        reverb.prepare(&params.ports());
        assert_finite_output(&mut reverb, params, &format!("{label} {which} (prepared)"));
    }

    // Smoothed: swept from defaults to the extremes while running
    for (params, which) in [(&min, "min"), (&max, "max"), (&undriven, "max undriven")] {
        let mut reverb = AetherReverb::new(sample_rate);
        assert_finite_output(&mut reverb, params, &format!("{label} {which} (smoothed)"));
    }
}

#[test]
fn extremes_at_default_rate() {
    run_extreme_test(DEFAULT_SAMPLE_RATE, "48 kHz");
}

#[test]
fn extremes_at_low_rate() {
    run_extreme_test(LOW_SAMPLE_RATE, "8 kHz");
}

#[test]
fn extremes_at_high_rate() {
    run_extreme_test(HIGH_SAMPLE_RATE, "192 kHz");
}

#[test]
fn defaults_at_extreme_rates() {
    let params = ReverbParams::default();
    for rate in [LOW_SAMPLE_RATE, 22050.0, 44100.0, 96000.0, HIGH_SAMPLE_RATE] {
        let mut reverb = AetherReverb::new(rate);
        reverb.prepare(&params.ports());
        assert_finite_output(&mut reverb, &params, &format!("defaults at {rate} Hz"));
    }
}

#[test]
fn out_of_range_host_values_are_clamped() {
    let mut params = ReverbParams::default();
    // Bypass `set` so the raw values reach the ports
    params.predelay = 1.0e6;
    params.late_delay_lines = 500.0;
    params.early_taps = -3.0;
    params.late_delay_line_feedback = 7.0;
    params.early_diffusion_stages = 99.0;
    params.late_high_cut_cutoff = 1.0e9;
    params.early_diffusion_drive = 80.0;
    params.seed_crossmix = -50.0;
    params.mix = f32::NAN;

    let mut reverb = AetherReverb::new(DEFAULT_SAMPLE_RATE);
    reverb.prepare(&params.ports());
    for id in ParamId::ALL {
        let desc = &PARAMS[id.index()];
        let value = reverb.param(id);
        assert!(
            value >= desc.min && value <= desc.max,
            "{}: {value} outside [{}, {}]",
            desc.name,
            desc.min,
            desc.max
        );
    }
    assert_eq!(reverb.param(ParamId::Mix), PARAMS[ParamId::Mix.index()].default);
    assert_finite_output(&mut reverb, &params, "out of range");
}

#[test]
fn extreme_inputs_stay_finite() {
    let params = ReverbParams {
        late_delay_line_feedback: 1.0,
        early_diffusion_drive: 12.0,
        late_diffusion_drive: 12.0,
        ..ReverbParams::default()
    };
    let mut reverb = AetherReverb::new(DEFAULT_SAMPLE_RATE);
    reverb.prepare(&params.ports());

    let loud = vec![1000.0f32; 512];
    let tiny = vec![1.0e-30f32; 512];
    let mut left = vec![0.0; 512];
    let mut right = vec![0.0; 512];
    for input in [&loud, &tiny, &loud] {
        reverb.process(512, &params.ports(), input, input, &mut left, &mut right);
        assert!(left.iter().chain(&right).all(|x| x.is_finite()));
    }
}
