//! Static parameter metadata.
//!
//! Each control of the reverb is described once by a `const`
//! [`ParamDescriptor`]: its name, id, unit, range, default and smoothing
//! time. Tables of descriptors are indexed from the audio thread and looked
//! up by id from setup code, neither of which allocates.
//!
//! ```rust
//! use aether_core::{ParamDescriptor, ParamKind, ParamUnit};
//!
//! const PREDELAY: ParamDescriptor =
//!     ParamDescriptor::knob("Predelay", "predelay", ParamUnit::Milliseconds, 0.0, 400.0, 20.0)
//!         .with_smoothing_ms(500.0);
//!
//! assert_eq!(PREDELAY.clamp(1000.0), 400.0);
//! assert_eq!(PREDELAY.kind, ParamKind::Continuous);
//! ```

/// How a parameter's values are meant to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Any value in range.
    Continuous,
    /// Whole numbers: counts, seeds, selectors.
    Stepped,
    /// 0 (off) or 1 (on).
    Toggle,
}

/// Display unit of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Gain or drive.
    Decibels,
    /// Cutoffs and modulation rates.
    Hertz,
    /// Delay times and modulation depths.
    Milliseconds,
    /// Levels, mix, width, crossmix.
    Percent,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Text appended to a value when printing it, e.g. `"250 ms"`.
    pub const fn suffix(self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

/// Everything the engine knows about one control.
///
/// `smoothing_ms` is the time constant given to
/// [`SmoothedParam`](crate::SmoothedParam); 0 makes changes land on the
/// next sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Human-readable name ("Late delay line feedback").
    pub name: &'static str,
    /// snake_case identifier ("late_delay_line_feedback").
    pub string_id: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Continuous, stepped or toggle.
    pub kind: ParamKind,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Value an unbound or freshly reset control reads.
    pub default: f32,
    /// One-pole smoothing time in ms.
    pub smoothing_ms: f32,
    /// Section the control belongs to ("early", "late", ...). Empty for none.
    pub group: &'static str,
}

impl ParamDescriptor {
    const fn base(
        name: &'static str,
        string_id: &'static str,
        unit: ParamUnit,
        kind: ParamKind,
        range: (f32, f32),
        default: f32,
    ) -> Self {
        Self {
            name,
            string_id,
            unit,
            kind,
            min: range.0,
            max: range.1,
            default,
            smoothing_ms: 0.0,
            group: "",
        }
    }

    /// Continuous control.
    pub const fn knob(
        name: &'static str,
        string_id: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, string_id, unit, ParamKind::Continuous, (min, max), default)
    }

    /// Whole-number control without a unit.
    pub const fn stepped(
        name: &'static str,
        string_id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, string_id, ParamUnit::None, ParamKind::Stepped, (min, max), default)
    }

    /// Switch, off by default.
    pub const fn toggle(name: &'static str, string_id: &'static str) -> Self {
        Self::base(name, string_id, ParamUnit::None, ParamKind::Toggle, (0.0, 1.0), 0.0)
    }

    /// Replaces the smoothing time.
    pub const fn with_smoothing_ms(mut self, smoothing_ms: f32) -> Self {
        self.smoothing_ms = smoothing_ms;
        self
    }

    /// Replaces the group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Brings a host value into range. NaN and infinities read as the default.
    ///
    /// ```rust
    /// use aether_core::{ParamDescriptor, ParamUnit};
    ///
    /// let gain = ParamDescriptor::knob("Gain", "gain", ParamUnit::Decibels, -24.0, 0.0, -2.0);
    /// assert_eq!(gain.clamp(-100.0), -24.0);
    /// assert_eq!(gain.clamp(f32::NAN), -2.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    /// `true` for stepped controls and toggles.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        !matches!(self.kind, ParamKind::Continuous)
    }
}
