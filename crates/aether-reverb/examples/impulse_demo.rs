//! Impulse response walkthrough for the Aether reverb.
//!
//! Renders the impulse response of a few presets and prints the arrival
//! time of each path plus the decay of the tail.
//!
//! Run with: cargo run -p aether-reverb --example impulse_demo --features tracing
//! (`RUST_LOG=debug` shows the engine's own events)

use aether_reverb::{AetherReverb, ParamId, ReverbParams};
use tracing_subscriber::EnvFilter;

const SAMPLE_RATE: f32 = 48000.0;
const LENGTH: usize = 3 * 48000;

struct Preset {
    name: &'static str,
    params: ReverbParams,
}

fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "default",
            params: ReverbParams::default(),
        },
        Preset {
            name: "small room",
            params: ReverbParams {
                predelay: 5.0,
                early_tap_length: 60.0,
                late_delay: 30.0,
                late_delay_lines: 6.0,
                late_delay_line_feedback: 0.6,
                ..ReverbParams::default()
            },
        },
        Preset {
            name: "hall",
            params: ReverbParams {
                predelay: 40.0,
                early_level: 30.0,
                late_level: 60.0,
                late_delay: 250.0,
                late_delay_lines: 12.0,
                late_delay_line_feedback: 0.9,
                late_high_shelf_enabled: 1.0,
                late_high_cut_enabled: 1.0,
                late_high_cut_cutoff: 8000.0,
                ..ReverbParams::default()
            },
        },
        Preset {
            name: "series bloom",
            params: ReverbParams {
                late_order: 1.0,
                late_delay_lines: 8.0,
                late_delay: 80.0,
                late_delay_line_feedback: 0.8,
                seed_crossmix: 20.0,
                ..ReverbParams::default()
            },
        },
    ]
}

fn render(params: &ReverbParams) -> (Vec<f32>, Vec<f32>) {
    let mut reverb = AetherReverb::new(SAMPLE_RATE);
    reverb.prepare(&params.ports());

    let mut input = vec![0.0f32; LENGTH];
    input[0] = 1.0;
    let mut left = vec![0.0f32; LENGTH];
    let mut right = vec![0.0f32; LENGTH];
    reverb.process(LENGTH, &params.ports(), &input, &input, &mut left, &mut right);
    (left, right)
}

fn solo(params: &ReverbParams, keep: ParamId) -> ReverbParams {
    let mut solo = params.clone();
    for id in [
        ParamId::DryLevel,
        ParamId::PredelayLevel,
        ParamId::EarlyLevel,
        ParamId::LateLevel,
    ] {
        if id != keep {
            solo.set(id, 0.0);
        }
    }
    solo
}

fn onset_ms(signal: &[f32]) -> Option<f32> {
    signal
        .iter()
        .position(|x| x.abs() > 1e-6)
        .map(|n| n as f32 / SAMPLE_RATE * 1000.0)
}

/// Time for the tail's running energy to fall 60 dB below its total.
fn rt60_ms(signal: &[f32]) -> Option<f32> {
    let total: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    if total == 0.0 {
        return None;
    }
    let mut remaining = total;
    for (n, &x) in signal.iter().enumerate() {
        remaining -= f64::from(x) * f64::from(x);
        if remaining < total * 1e-6 {
            return Some(n as f32 / SAMPLE_RATE * 1000.0);
        }
    }
    None
}

fn correlation(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let ea: f64 = a.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    let eb: f64 = b.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    dot / (ea * eb).sqrt()
}

fn describe(params: &ReverbParams) -> String {
    [
        ParamId::Predelay,
        ParamId::LateDelay,
        ParamId::LateDelayLines,
        ParamId::LateDelayLineFeedback,
    ]
    .iter()
    .map(|&id| {
        let desc = id.descriptor();
        format!("{} {}{}", desc.string_id, params.get(id), desc.unit.suffix())
    })
    .collect::<Vec<_>>()
    .join(", ")
}

fn format_ms(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |ms| format!("{ms:.1} ms"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Aether Impulse Demo");
    println!("===================\n");

    for preset in presets() {
        tracing::info!(preset = preset.name, "rendering");
        println!("{}", preset.name);
        println!("{}", "-".repeat(preset.name.len()));
        println!("  {}", describe(&preset.params));

        for (label, id) in [
            ("dry", ParamId::DryLevel),
            ("predelay", ParamId::PredelayLevel),
            ("early", ParamId::EarlyLevel),
            ("late", ParamId::LateLevel),
        ] {
            let (left, _) = render(&solo(&preset.params, id));
            println!("  {label:<9} onset {:>10}", format_ms(onset_ms(&left)));
        }

        let (left, right) = render(&solo(&preset.params, ParamId::LateLevel));
        println!("  late tail decays 60 dB in {}", format_ms(rt60_ms(&left)));
        println!("  L/R correlation {:.3}\n", correlation(&left, &right));
    }
}
