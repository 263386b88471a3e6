//! Behavioral regression tests for the reverb engine.
//!
//! Each test pins one externally observable guarantee: finite output, exact
//! silence and exact bypass at the mixer extremes, bounded decay at maximum
//! feedback, seed determinism, stereo crossmix, smooth automation, and
//! passive impulse energy.

use aether_reverb::{AetherReverb, ParamId, ReverbParams};

const SAMPLE_RATE: f32 = 48000.0;

/// Runs `input` through a freshly prepared engine.
fn render(params: &ReverbParams, left: &[f32], right: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut reverb = AetherReverb::new(SAMPLE_RATE);
    reverb.prepare(&params.ports());
    render_with(&mut reverb, params, left, right)
}

/// Runs `input` through `reverb` in 256-frame blocks.
fn render_with(
    reverb: &mut AetherReverb,
    params: &ReverbParams,
    left: &[f32],
    right: &[f32],
) -> (Vec<f32>, Vec<f32>) {
    let mut out_l = vec![0.0; left.len()];
    let mut out_r = vec![0.0; right.len()];
    let ports = params.ports();
    for start in (0..left.len()).step_by(256) {
        let end = (start + 256).min(left.len());
        reverb.process(
            end - start,
            &ports,
            &left[start..end],
            &right[start..end],
            &mut out_l[start..end],
            &mut out_r[start..end],
        );
    }
    (out_l, out_r)
}

fn impulse(len: usize) -> Vec<f32> {
    let mut signal = vec![0.0; len];
    signal[0] = 1.0;
    signal
}

/// Deterministic white-ish noise in [-0.5, 0.5].
fn noise(len: usize, mut state: u32) -> Vec<f32> {
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as f32 / u32::MAX as f32 - 0.5
        })
        .collect()
}

fn sine(len: usize, freq: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|n| amplitude * (core::f32::consts::TAU * freq * n as f32 / SAMPLE_RATE).sin())
        .collect()
}

fn energy(signal: &[f32]) -> f64 {
    signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
}

/// Zero-lag normalized correlation.
fn correlation(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    dot / (energy(a) * energy(b)).sqrt()
}

fn wet_only() -> ReverbParams {
    ReverbParams {
        dry_level: 0.0,
        predelay_level: 0.0,
        ..ReverbParams::default()
    }
}

// ============================================================================
// Finite output
// ============================================================================

#[test]
fn defaults_finite_for_impulse_silence_and_noise() {
    let params = ReverbParams::default();
    for (label, signal) in [
        ("impulse", impulse(48000)),
        ("silence", vec![0.0; 48000]),
        ("noise", noise(48000, 0x1234_5678)),
    ] {
        let (l, r) = render(&params, &signal, &signal);
        assert!(
            l.iter().chain(&r).all(|x| x.is_finite()),
            "{label}: non-finite output"
        );
    }
}

#[test]
fn silence_in_silence_out() {
    let silence = vec![0.0; 24000];
    let (l, r) = render(&ReverbParams::default(), &silence, &silence);
    assert!(l.iter().chain(&r).all(|&x| x == 0.0));
}

// ============================================================================
// Mixer extremes
// ============================================================================

#[test]
fn all_levels_zero_is_silent() {
    let params = ReverbParams {
        mix: 100.0,
        dry_level: 0.0,
        predelay_level: 0.0,
        early_level: 0.0,
        late_level: 0.0,
        late_delay_line_feedback: 0.95,
        ..ReverbParams::default()
    };
    let input = noise(24000, 7);
    let (l, r) = render(&params, &input, &input);
    assert!(l.iter().chain(&r).all(|&x| x == 0.0));
}

#[test]
fn mix_zero_is_exact_bypass() {
    let params = ReverbParams {
        mix: 0.0,
        early_diffusion_drive: 12.0,
        late_delay_lines: 12.0,
        late_delay_line_feedback: 1.0,
        late_order: 1.0,
        interpolate: 1.0,
        ..ReverbParams::default()
    };
    let left = noise(24000, 11);
    let right = noise(24000, 13);
    let (l, r) = render(&params, &left, &right);
    assert_eq!(l, left);
    assert_eq!(r, right);
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn impulse_decays_at_maximum_feedback() {
    let params = ReverbParams {
        dry_level: 0.0,
        late_delay: 10.0,
        late_delay_lines: 3.0,
        late_delay_line_feedback: 1.0,
        late_diffusion_stages: 0.0,
        ..ReverbParams::default()
    };
    let input = impulse(300_000);
    let (l, r) = render(&params, &input, &input);

    let peak = l.iter().chain(&r).fold(0.0f32, |m, x| m.max(x.abs()));
    assert!(peak < 2.0, "peak = {peak}");

    let tail = l[290_000..]
        .iter()
        .chain(&r[290_000..])
        .fold(0.0f32, |m, x| m.max(x.abs()));
    assert!(tail < 1e-4, "tail = {tail}");
}

/// Every late loop at its limit with the fastest, deepest modulation and the
/// saturators off. The modulated reads must not pump energy into the loop.
#[test]
fn full_modulation_decays_at_maximum_feedback() {
    const SECONDS: usize = 60;
    let len = SECONDS * SAMPLE_RATE as usize;
    let last_second = len - SAMPLE_RATE as usize;
    let input = impulse(len);
    let silence = vec![0.0; len];

    for late_order in [0.0, 1.0] {
        for interpolate in [0.0, 1.0] {
            let params = ReverbParams {
                late_order,
                interpolate,
                late_delay_lines: 12.0,
                late_delay_line_feedback: 1.0,
                late_delay_mod_depth: 50.0,
                late_delay_mod_rate: 5.0,
                late_diffusion_stages: 8.0,
                late_diffusion_delay: 10.0,
                late_diffusion_feedback: 1.0,
                late_diffusion_mod_depth: 3.0,
                late_diffusion_mod_rate: 5.0,
                early_diffusion_drive: -12.0,
                late_diffusion_drive: -12.0,
                ..wet_only()
            };
            let (l, r) = render(&params, &input, &silence);
            assert!(
                l.iter().chain(&r).all(|x| x.is_finite()),
                "order {late_order}, interpolate {interpolate}: non-finite output"
            );
            let tail = l[last_second..]
                .iter()
                .chain(&r[last_second..])
                .fold(0.0f32, |m, x| m.max(x.abs()));
            assert!(
                tail < 1e-3,
                "order {late_order}, interpolate {interpolate}: tail = {tail}"
            );
        }
    }
}

#[test]
fn max_diffusion_feedback_stays_bounded() {
    let params = ReverbParams {
        early_diffusion_feedback: 1.0,
        late_diffusion_feedback: 1.0,
        late_delay_line_feedback: 1.0,
        ..ReverbParams::default()
    };
    let input = noise(48000, 99);
    let (l, r) = render(&params, &input, &input);
    let peak = l.iter().chain(&r).fold(0.0f32, |m, x| m.max(x.abs()));
    assert!(peak.is_finite() && peak < 20.0, "peak = {peak}");
}

// ============================================================================
// Seeds and crossmix
// ============================================================================

#[test]
fn same_seed_reproduces_output() {
    let params = ReverbParams {
        tap_seed: 5.0,
        early_diffusion_seed: 6.0,
        delay_seed: 7.0,
        late_diffusion_seed: 8.0,
        ..wet_only()
    };
    let input = impulse(24000);
    let (first_l, first_r) = render(&params, &input, &input);

    // Visit another seed first, then come back
    let mut reverb = AetherReverb::new(SAMPLE_RATE);
    let detour = ReverbParams {
        tap_seed: 500.0,
        delay_seed: 700.0,
        ..params.clone()
    };
    reverb.prepare(&detour.ports());
    reverb.prepare(&params.ports());
    reverb.reset();
    let (second_l, second_r) = render_with(&mut reverb, &params, &input, &input);

    assert_eq!(first_l, second_l);
    assert_eq!(first_r, second_r);
}

#[test]
fn each_seed_changes_output() {
    let base = wet_only();
    let input = impulse(24000);
    let (reference, _) = render(&base, &input, &input);

    for id in [
        ParamId::TapSeed,
        ParamId::EarlyDiffusionSeed,
        ParamId::DelaySeed,
        ParamId::LateDiffusionSeed,
    ] {
        let mut params = base.clone();
        params.set(id, 42.0);
        let (changed, _) = render(&params, &input, &input);
        assert_ne!(reference, changed, "{id:?} had no effect");
    }
}

#[test]
fn full_crossmix_gives_identical_channels() {
    let params = ReverbParams {
        seed_crossmix: 100.0,
        early_diffusion_mod_depth: 1.0,
        late_delay_lines: 6.0,
        ..ReverbParams::default()
    };
    let input = noise(24000, 3);
    let (l, r) = render(&params, &input, &input);
    assert_eq!(l, r);
}

#[test]
fn lower_crossmix_decorrelates_channels() {
    let input = impulse(48000);
    let corr = |crossmix: f32| {
        let params = ReverbParams {
            seed_crossmix: crossmix,
            ..wet_only()
        };
        let (l, r) = render(&params, &input, &input);
        correlation(&l, &r)
    };

    let shared = corr(100.0);
    let partial = corr(50.0);
    let independent = corr(0.0);
    assert!((shared - 1.0).abs() < 1e-9, "crossmix 100: {shared}");
    assert!(partial < shared - 1e-6, "crossmix 50: {partial}");
    assert!(independent < 0.5, "crossmix 0: {independent}");
}

// ============================================================================
// Automation
// ============================================================================

#[test]
fn smoothed_changes_are_continuous() {
    let input = sine(96000, 220.0, 0.1);
    let start = ReverbParams::default();
    let target = ReverbParams {
        mix: 30.0,
        width: 20.0,
        predelay: 100.0,
        early_level: 50.0,
        late_level: 80.0,
        early_tap_length: 350.0,
        late_delay: 300.0,
        late_delay_line_feedback: 0.85,
        seed_crossmix: 10.0,
        ..ReverbParams::default()
    };

    let mut reverb = AetherReverb::new(SAMPLE_RATE);
    reverb.prepare(&start.ports());
    let (warm, _) = render_with(&mut reverb, &start, &input[..48000], &input[..48000]);
    let (moving, _) = render_with(&mut reverb, &target, &input[48000..], &input[48000..]);

    let max_step = |signal: &[f32], previous: f32| {
        let mut last = previous;
        signal.iter().fold(0.0f32, |m, &x| {
            let step = (x - last).abs();
            last = x;
            m.max(step)
        })
    };
    let steady = max_step(&warm[24000..], warm[23999]);
    let transition = max_step(&moving, warm[47999]);
    assert!(transition < 0.05, "transition step {transition}, steady {steady}");
}

// ============================================================================
// Impulse scenario
// ============================================================================

/// First sample whose magnitude exceeds a tiny threshold.
fn onset(signal: &[f32]) -> usize {
    signal
        .iter()
        .position(|x| x.abs() > 1e-9)
        .unwrap_or(signal.len())
}

#[test]
fn impulse_paths_arrive_in_order() {
    let input = impulse(48000);
    let silence = vec![0.0; 48000];
    let solo = |id: ParamId| {
        let mut params = ReverbParams {
            dry_level: 0.0,
            predelay_level: 0.0,
            early_level: 0.0,
            late_level: 0.0,
            ..ReverbParams::default()
        };
        params.set(id, 100.0);
        let (l, _) = render(&params, &input, &silence);
        onset(&l)
    };

    let dry = solo(ParamId::DryLevel);
    let predelay = solo(ParamId::PredelayLevel);
    let early = solo(ParamId::EarlyLevel);
    let late = solo(ParamId::LateLevel);

    assert_eq!(dry, 0);
    assert_eq!(predelay, 960, "20 ms predelay at 48 kHz");
    assert!(early >= predelay, "early {early} before predelay {predelay}");
    assert!(late > early, "late {late} not after early {early}");
}

#[test]
fn impulse_energy_is_passive() {
    let params = ReverbParams::default();
    let input = impulse(144_000);
    let silence = vec![0.0; 144_000];
    let (l, r) = render(&params, &input, &silence);

    let levels = (params.dry_level + params.predelay_level + params.early_level + params.late_level)
        / 100.0;
    let output = energy(&l) + energy(&r);
    assert!(output > 0.0);
    assert!(
        output < f64::from(levels) * energy(&input),
        "output energy {output} vs bound {levels}"
    );
}
