//! The reverb's parameter set.
//!
//! Three views of the same 47 controls, all generated from one declaration
//! list so they can never drift apart:
//!
//! - [`ParamId`] - index into every per-parameter array, in port order
//! - [`PARAMS`] - static descriptor table (range, default, smoothing time)
//! - [`ReverbParams`] - named host-side storage, one `f32` per parameter
//!
//! [`ParamPorts`] is the per-block binding the engine reads targets from:
//! one optional read-only reference per parameter, falling back to the
//! declared default when unbound.
//!
//! # Example
//!
//! ```rust
//! use aether_reverb::{ParamId, ParamPorts, ReverbParams, PARAMS};
//!
//! let mut params = ReverbParams::default();
//! params.late_delay_line_feedback = 0.9;
//!
//! let ports = params.ports();
//! assert_eq!(ports.value(ParamId::LateDelayLineFeedback), 0.9);
//!
//! // Unbound ports read the declared default
//! let empty = ParamPorts::unbound();
//! assert_eq!(empty.value(ParamId::Mix), PARAMS[ParamId::Mix.index()].default);
//! ```

use aether_core::{ParamDescriptor, ParamUnit};

use crate::ReverbError;

/// Number of parameters (and parameter ports).
pub const PARAM_COUNT: usize = 47;

const fn percent(name: &'static str, id: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::Percent, 0.0, 100.0, default)
}

const fn cutoff(name: &'static str, id: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::Hertz, 15.0, 22000.0, default)
}

const fn millis(name: &'static str, id: &'static str, min: f32, max: f32, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::Milliseconds, min, max, default)
}

const fn hertz(name: &'static str, id: &'static str, max: f32, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::Hertz, 0.0, max, default)
}

const fn unit(name: &'static str, id: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::None, 0.0, 1.0, default)
}

const fn decibels(name: &'static str, id: &'static str, min: f32, max: f32, default: f32) -> ParamDescriptor {
    ParamDescriptor::knob(name, id, ParamUnit::Decibels, min, max, default)
}

const fn seed(name: &'static str, id: &'static str) -> ParamDescriptor {
    ParamDescriptor::stepped(name, id, 1.0, 99999.0, 1.0)
}

macro_rules! declare_params {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident => $field:ident: $descriptor:expr
        ),+ $(,)?
    ) => {
        /// Parameter index, in port order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum ParamId {
            $(
                $(#[$doc])*
                $variant,
            )+
        }

        impl ParamId {
            /// Every parameter, in port order.
            pub const ALL: [ParamId; PARAM_COUNT] = [$(ParamId::$variant),+];
        }

        /// Descriptor table, indexed by [`ParamId::index`].
        pub static PARAMS: [ParamDescriptor; PARAM_COUNT] = [$($descriptor),+];

        /// Named host-side parameter storage.
        ///
        /// Values are plain (unnormalized) and are clamped by the engine when
        /// read, so a host may write anything here.
        #[derive(Debug, Clone, PartialEq)]
        pub struct ReverbParams {
            $(
                $(#[$doc])*
                pub $field: f32,
            )+
        }

        impl ReverbParams {
            /// Binds every field to its port.
            pub fn ports(&self) -> ParamPorts<'_> {
                ParamPorts {
                    slots: [$(Some(&self.$field)),+],
                }
            }

            /// Reads a value by id.
            pub fn get(&self, id: ParamId) -> f32 {
                match id {
                    $(ParamId::$variant => self.$field,)+
                }
            }

            /// Writes a value by id, clamped to the declared range.
            pub fn set(&mut self, id: ParamId, value: f32) {
                let value = id.descriptor().clamp(value);
                match id {
                    $(ParamId::$variant => self.$field = value,)+
                }
            }
        }

        impl Default for ReverbParams {
            fn default() -> Self {
                Self {
                    $($field: ParamId::$variant.descriptor().default,)+
                }
            }
        }
    };
}

declare_params! {
    /// Dry/wet balance, percent.
    Mix => mix: percent("Mix", "mix", 100.0).with_smoothing_ms(5.0).with_group("mixer"),
    /// Dry signal level, percent.
    DryLevel => dry_level: percent("Dry", "dry_level", 80.0).with_smoothing_ms(5.0).with_group("mixer"),
    /// Predelayed signal level, percent.
    PredelayLevel => predelay_level: percent("Predelay level", "predelay_level", 20.0)
        .with_smoothing_ms(5.0)
        .with_group("mixer"),
    /// Early reflection level, percent.
    EarlyLevel => early_level: percent("Early level", "early_level", 10.0)
        .with_smoothing_ms(5.0)
        .with_group("mixer"),
    /// Late reverberation level, percent.
    LateLevel => late_level: percent("Late level", "late_level", 20.0)
        .with_smoothing_ms(5.0)
        .with_group("mixer"),
    /// Linear interpolation inside the late diffusers.
    Interpolate => interpolate: ParamDescriptor::toggle("Interpolate", "interpolate"),
    /// Stereo width of the predelay matrix, percent.
    Width => width: percent("Width", "width", 100.0).with_smoothing_ms(5.0).with_group("predelay"),
    /// Predelay time.
    Predelay => predelay: millis("Predelay", "predelay", 0.0, 400.0, 20.0)
        .with_smoothing_ms(500.0)
        .with_group("predelay"),
    /// Early highpass on/off.
    EarlyLowCutEnabled => early_low_cut_enabled:
        ParamDescriptor::toggle("Early low cut enabled", "early_low_cut_enabled").with_group("early"),
    /// Early highpass cutoff.
    EarlyLowCutCutoff => early_low_cut_cutoff:
        cutoff("Early low cut cutoff", "early_low_cut_cutoff", 15.0).with_group("early"),
    /// Early lowpass on/off.
    EarlyHighCutEnabled => early_high_cut_enabled:
        ParamDescriptor::toggle("Early high cut enabled", "early_high_cut_enabled").with_group("early"),
    /// Early lowpass cutoff.
    EarlyHighCutCutoff => early_high_cut_cutoff:
        cutoff("Early high cut cutoff", "early_high_cut_cutoff", 20000.0).with_group("early"),
    /// Multitap tap count.
    EarlyTaps => early_taps: ParamDescriptor::stepped("Early taps", "early_taps", 1.0, 50.0, 12.0)
        .with_group("early"),
    /// Span of the tap pattern.
    EarlyTapLength => early_tap_length: millis("Early tap length", "early_tap_length", 0.0, 500.0, 200.0)
        .with_smoothing_ms(400.0)
        .with_group("early"),
    /// Multitap output blended with its input, percent.
    EarlyTapMix => early_tap_mix: percent("Early tap mix", "early_tap_mix", 100.0)
        .with_smoothing_ms(5.0)
        .with_group("early"),
    /// Tap gain decay across the pattern (0 = flat).
    EarlyTapDecay => early_tap_decay: unit("Early tap decay", "early_tap_decay", 0.5)
        .with_smoothing_ms(2.5)
        .with_group("early"),
    /// Early diffuser stage count.
    EarlyDiffusionStages => early_diffusion_stages:
        ParamDescriptor::stepped("Early diffusion stages", "early_diffusion_stages", 0.0, 8.0, 7.0)
            .with_group("early"),
    /// Early diffuser base stage delay.
    EarlyDiffusionDelay => early_diffusion_delay:
        millis("Early diffusion delay", "early_diffusion_delay", 10.0, 100.0, 20.0)
            .with_smoothing_ms(500.0)
            .with_group("early"),
    /// Early diffuser modulation depth.
    EarlyDiffusionModDepth => early_diffusion_mod_depth:
        millis("Early diffusion mod depth", "early_diffusion_mod_depth", 0.0, 3.0, 0.0)
            .with_smoothing_ms(100.0)
            .with_group("early"),
    /// Early diffuser modulation rate.
    EarlyDiffusionModRate => early_diffusion_mod_rate:
        hertz("Early diffusion mod rate", "early_diffusion_mod_rate", 5.0, 1.0).with_group("early"),
    /// Early diffuser allpass gain.
    EarlyDiffusionFeedback => early_diffusion_feedback:
        unit("Early diffusion feedback", "early_diffusion_feedback", 0.7)
            .with_smoothing_ms(50.0)
            .with_group("early"),
    /// Late network topology (0 = parallel, 1 = series).
    LateOrder => late_order: ParamDescriptor::stepped("Late order", "late_order", 0.0, 1.0, 0.0)
        .with_group("late"),
    /// Number of active late delay lines.
    LateDelayLines => late_delay_lines:
        ParamDescriptor::stepped("Late delay lines", "late_delay_lines", 1.0, 12.0, 3.0).with_group("late"),
    /// Late delay line base length.
    LateDelay => late_delay: millis("Late delay", "late_delay", 0.05, 1000.0, 100.0)
        .with_smoothing_ms(500.0)
        .with_group("late"),
    /// Late delay line modulation depth.
    LateDelayModDepth => late_delay_mod_depth:
        millis("Late delay mod depth", "late_delay_mod_depth", 0.0, 50.0, 0.2)
            .with_smoothing_ms(100.0)
            .with_group("late"),
    /// Late delay line modulation rate.
    LateDelayModRate => late_delay_mod_rate:
        hertz("Late delay mod rate", "late_delay_mod_rate", 5.0, 0.2).with_group("late"),
    /// Late delay line recirculation.
    LateDelayLineFeedback => late_delay_line_feedback:
        unit("Late delay line feedback", "late_delay_line_feedback", 0.7)
            .with_smoothing_ms(5.0)
            .with_group("late"),
    /// Late diffuser stage count.
    LateDiffusionStages => late_diffusion_stages:
        ParamDescriptor::stepped("Late diffusion stages", "late_diffusion_stages", 0.0, 8.0, 7.0)
            .with_group("late"),
    /// Late diffuser base stage delay.
    LateDiffusionDelay => late_diffusion_delay:
        millis("Late diffusion delay", "late_diffusion_delay", 10.0, 100.0, 50.0)
            .with_smoothing_ms(500.0)
            .with_group("late"),
    /// Late diffuser modulation depth.
    LateDiffusionModDepth => late_diffusion_mod_depth:
        millis("Late diffusion mod depth", "late_diffusion_mod_depth", 0.0, 3.0, 0.2)
            .with_smoothing_ms(200.0)
            .with_group("late"),
    /// Late diffuser modulation rate.
    LateDiffusionModRate => late_diffusion_mod_rate:
        hertz("Late diffusion mod rate", "late_diffusion_mod_rate", 5.0, 0.5).with_group("late"),
    /// Late diffuser allpass gain.
    LateDiffusionFeedback => late_diffusion_feedback:
        unit("Late diffusion feedback", "late_diffusion_feedback", 0.7)
            .with_smoothing_ms(50.0)
            .with_group("late"),
    /// Late low shelf on/off.
    LateLowShelfEnabled => late_low_shelf_enabled:
        ParamDescriptor::toggle("Late low shelf enabled", "late_low_shelf_enabled").with_group("damping"),
    /// Late low shelf corner.
    LateLowShelfCutoff => late_low_shelf_cutoff:
        cutoff("Late low shelf cutoff", "late_low_shelf_cutoff", 100.0).with_group("damping"),
    /// Late low shelf gain.
    LateLowShelfGain => late_low_shelf_gain:
        decibels("Late low shelf gain", "late_low_shelf_gain", -24.0, 0.0, -2.0).with_group("damping"),
    /// Late high shelf on/off.
    LateHighShelfEnabled => late_high_shelf_enabled:
        ParamDescriptor::toggle("Late high shelf enabled", "late_high_shelf_enabled").with_group("damping"),
    /// Late high shelf corner.
    LateHighShelfCutoff => late_high_shelf_cutoff:
        cutoff("Late high shelf cutoff", "late_high_shelf_cutoff", 1500.0).with_group("damping"),
    /// Late high shelf gain.
    LateHighShelfGain => late_high_shelf_gain:
        decibels("Late high shelf gain", "late_high_shelf_gain", -24.0, 0.0, -3.0).with_group("damping"),
    /// Late lowpass on/off.
    LateHighCutEnabled => late_high_cut_enabled:
        ParamDescriptor::toggle("Late high cut enabled", "late_high_cut_enabled").with_group("damping"),
    /// Late lowpass cutoff.
    LateHighCutCutoff => late_high_cut_cutoff:
        cutoff("Late high cut cutoff", "late_high_cut_cutoff", 20000.0).with_group("damping"),
    /// How much the left and right random structures share, percent.
    SeedCrossmix => seed_crossmix: percent("Seed crossmix", "seed_crossmix", 80.0)
        .with_smoothing_ms(500.0)
        .with_group("seed"),
    /// Multitap pattern seed.
    TapSeed => tap_seed: seed("Tap seed", "tap_seed").with_group("seed"),
    /// Early diffuser seed.
    EarlyDiffusionSeed => early_diffusion_seed:
        seed("Early diffusion seed", "early_diffusion_seed").with_group("seed"),
    /// Late delay line seed.
    DelaySeed => delay_seed: seed("Delay seed", "delay_seed").with_group("seed"),
    /// Late diffuser seed.
    LateDiffusionSeed => late_diffusion_seed:
        seed("Late diffusion seed", "late_diffusion_seed").with_group("seed"),
    /// Early diffuser input drive (-12 dB = off).
    EarlyDiffusionDrive => early_diffusion_drive:
        decibels("Early diffusion drive", "early_diffusion_drive", -12.0, 12.0, -12.0).with_group("drive"),
    /// Late diffuser input drive (-12 dB = off).
    LateDiffusionDrive => late_diffusion_drive:
        decibels("Late diffusion drive", "late_diffusion_drive", -12.0, 12.0, -12.0).with_group("drive"),
}

impl ParamId {
    /// Position in the port array and in [`PARAMS`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The parameter's descriptor.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAMS[self.index()]
    }

    /// Parameter at `index`, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Looks a parameter up by display name or string id (case-insensitive).
    ///
    /// Linear scan; meant for setup paths, not the audio thread.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| {
            let desc = id.descriptor();
            desc.string_id.eq_ignore_ascii_case(name) || desc.name.eq_ignore_ascii_case(name)
        })
    }
}

/// One optional read-only reference per parameter.
///
/// A bound slot is read (and clamped) every block; an unbound slot yields
/// the parameter's declared default.
#[derive(Debug, Clone, Copy)]
pub struct ParamPorts<'a> {
    slots: [Option<&'a f32>; PARAM_COUNT],
}

impl<'a> ParamPorts<'a> {
    /// Ports with nothing bound: every parameter reads its default.
    pub const fn unbound() -> Self {
        Self {
            slots: [None; PARAM_COUNT],
        }
    }

    /// Binds `id` to host-owned storage.
    pub fn bind(&mut self, id: ParamId, value: &'a f32) {
        self.slots[id.index()] = Some(value);
    }

    /// Binds the parameter named `name` (see [`ParamId::from_name`]).
    pub fn bind_by_name(&mut self, name: &str, value: &'a f32) -> Result<ParamId, ReverbError> {
        let id = ParamId::from_name(name).ok_or_else(|| ReverbError::unknown_parameter(name))?;
        self.bind(id, value);
        Ok(id)
    }

    /// Raw bound value, or `None` when unbound.
    #[inline]
    pub fn get(&self, id: ParamId) -> Option<f32> {
        self.slots[id.index()].copied()
    }

    /// Effective target: the bound value clamped to range, or the default.
    #[inline]
    pub fn value(&self, id: ParamId) -> f32 {
        let desc = id.descriptor();
        match self.slots[id.index()] {
            Some(&value) => desc.clamp(value),
            None => desc.default,
        }
    }
}

impl Default for ParamPorts<'_> {
    fn default() -> Self {
        Self::unbound()
    }
}
