//! Early reflection path: cut filters, multitap, diffuser.

use aether_core::{Highpass6dB, Lowpass6dB};

use crate::diffuser::{AllpassDiffuser, DiffuserSettings};
use crate::multitap::MultitapDelay;

/// Seed domain salt for the early diffuser.
const EARLY_DIFFUSION_SALT: u64 = 0xE4D1_0002;

/// Per-sample early path configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlySettings {
    /// Run the highpass (off = pass-through).
    pub low_cut: bool,
    /// Run the lowpass (off = pass-through).
    pub high_cut: bool,
    /// Active multitap taps.
    pub taps: usize,
    /// Tap pattern span in samples.
    pub tap_length: f32,
    /// Multitap output blended over its input, `[0, 1]`.
    pub tap_mix: f32,
    /// Diffuser configuration. Interpolation is forced on.
    pub diffuser: DiffuserSettings,
}

impl Default for EarlySettings {
    fn default() -> Self {
        Self {
            low_cut: false,
            high_cut: false,
            taps: 12,
            tap_length: 0.0,
            tap_mix: 1.0,
            diffuser: DiffuserSettings::default(),
        }
    }
}

/// One channel of early reflections, single precision.
#[derive(Debug, Clone)]
pub struct EarlyReflections {
    low_cut: Highpass6dB<f32>,
    high_cut: Lowpass6dB<f32>,
    multitap: MultitapDelay,
    diffuser: AllpassDiffuser<f32>,
}

impl EarlyReflections {
    /// Creates the path at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            low_cut: Highpass6dB::new(sample_rate, 15.0),
            high_cut: Lowpass6dB::new(sample_rate, 20000.0),
            multitap: MultitapDelay::new(sample_rate),
            diffuser: AllpassDiffuser::new(sample_rate, EARLY_DIFFUSION_SALT),
        }
    }

    /// Highpass cutoff in Hz.
    pub fn set_low_cut(&mut self, hz: f32) {
        self.low_cut.set_cutoff(hz);
    }

    /// Lowpass cutoff in Hz.
    pub fn set_high_cut(&mut self, hz: f32) {
        self.high_cut.set_cutoff(hz);
    }

    /// The multitap stage.
    pub fn multitap_mut(&mut self) -> &mut MultitapDelay {
        &mut self.multitap
    }

    /// The diffuser stage.
    pub fn diffuser_mut(&mut self) -> &mut AllpassDiffuser<f32> {
        &mut self.diffuser
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32, settings: &EarlySettings) -> f32 {
        let mut x = input;
        if settings.low_cut {
            x = self.low_cut.process(x);
        }
        if settings.high_cut {
            x = self.high_cut.process(x);
        }

        let tapped = self.multitap.process(x, settings.taps, settings.tap_length);
        x += settings.tap_mix * (tapped - x);

        let diffuser = DiffuserSettings {
            interpolate: true,
            ..settings.diffuser
        };
        self.diffuser.process(x, &diffuser)
    }

    /// Clears all audio state.
    pub fn clear(&mut self) {
        self.low_cut.reset();
        self.high_cut.reset();
        self.multitap.clear();
        self.diffuser.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transparent() -> EarlySettings {
        EarlySettings {
            tap_mix: 0.0,
            diffuser: DiffuserSettings {
                stages: 0,
                ..DiffuserSettings::default()
            },
            ..EarlySettings::default()
        }
    }

    #[test]
    fn disabled_stages_pass_through() {
        let mut early = EarlyReflections::new(48000.0);
        early.set_low_cut(5000.0);
        early.set_high_cut(100.0);
        let settings = transparent();
        for &x in &[1.0, -0.5, 0.25, 0.0] {
            assert_eq!(early.process(x, &settings), x);
        }
    }

    #[test]
    fn low_cut_removes_dc() {
        let mut early = EarlyReflections::new(48000.0);
        early.set_low_cut(500.0);
        let settings = EarlySettings {
            low_cut: true,
            ..transparent()
        };
        let mut y = 1.0;
        for _ in 0..48000 {
            y = early.process(1.0, &settings);
        }
        assert!(y.abs() < 1e-3, "dc leaked: {y}");
    }

    #[test]
    fn high_cut_passes_dc() {
        let mut early = EarlyReflections::new(48000.0);
        early.set_high_cut(500.0);
        let settings = EarlySettings {
            high_cut: true,
            ..transparent()
        };
        let mut y = 0.0;
        for _ in 0..48000 {
            y = early.process(1.0, &settings);
        }
        assert!((y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn full_path_spreads_impulse() {
        let mut early = EarlyReflections::new(48000.0);
        early.diffuser_mut().set_delay(960.0);
        let settings = EarlySettings {
            tap_length: 9600.0,
            ..EarlySettings::default()
        };
        let response: Vec<f32> = (0..48000)
            .map(|i| early.process(if i == 0 { 1.0 } else { 0.0 }, &settings))
            .collect();
        assert!(response.iter().all(|x| x.is_finite()));
        let nonzero = response.iter().filter(|x| x.abs() > 1e-5).count();
        assert!(nonzero > 1000, "only {nonzero} nonzero samples");
    }

    #[test]
    fn clear_silences() {
        let mut early = EarlyReflections::new(48000.0);
        early.diffuser_mut().set_delay(960.0);
        let settings = EarlySettings {
            tap_length: 4800.0,
            ..EarlySettings::default()
        };
        for _ in 0..1000 {
            early.process(0.5, &settings);
        }
        early.clear();
        for _ in 0..1000 {
            assert_eq!(early.process(0.0, &settings), 0.0);
        }
    }
}
