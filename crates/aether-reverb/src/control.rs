//! Parameter smoothing and change tracking.
//!
//! [`ParamBank`] holds one [`SmoothedParam`] per entry of [`PARAMS`] plus a
//! dirty flag per entry. The engine drives it in three steps:
//!
//! 1. once per block, [`refresh_targets`](ParamBank::refresh_targets) pulls
//!    clamped targets from the host's [`ParamPorts`]
//! 2. once per sample, [`advance`](ParamBank::advance) smooths every value
//!    and records which ones moved
//! 3. the engine then reads [`is_changed`](ParamBank::is_changed) and pushes
//!    only the moved values into its components
//!
//! Coefficient recomputation and reseeding therefore only ever happen on
//! samples where the owning parameter actually changed.

use aether_core::SmoothedParam;

use crate::params::{PARAM_COUNT, PARAMS, ParamId, ParamPorts};

/// Smoothed values and per-sample change flags for every parameter.
#[derive(Debug, Clone)]
pub struct ParamBank {
    params: [SmoothedParam; PARAM_COUNT],
    changed: [bool; PARAM_COUNT],
}

impl ParamBank {
    /// Creates a bank at `sample_rate`, every parameter at its default.
    ///
    /// All change flags start set so the first dispatch configures every
    /// component.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            params: core::array::from_fn(|i| {
                let desc = &PARAMS[i];
                SmoothedParam::with_config(desc.default, sample_rate, desc.smoothing_ms)
            }),
            changed: [true; PARAM_COUNT],
        }
    }

    /// Recomputes every smoothing coefficient for a new sample rate.
    ///
    /// Current values and targets are kept.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for param in &mut self.params {
            param.set_sample_rate(sample_rate);
        }
    }

    /// Reads every port into its target (clamped, default when unbound).
    pub fn refresh_targets(&mut self, ports: &ParamPorts<'_>) {
        for (param, id) in self.params.iter_mut().zip(ParamId::ALL) {
            param.set_target(ports.value(id));
        }
    }

    /// Sets one target directly (clamped to the declared range).
    pub fn set_target(&mut self, id: ParamId, value: f32) {
        self.params[id.index()].set_target(id.descriptor().clamp(value));
    }

    /// Advances every parameter by one sample and updates the change flags.
    ///
    /// Returns `true` if any parameter changed.
    #[inline]
    pub fn advance(&mut self) -> bool {
        let mut any = false;
        for (param, changed) in self.params.iter_mut().zip(self.changed.iter_mut()) {
            *changed = param.advance();
            any |= *changed;
        }
        any
    }

    /// Whether `id` changed on the last [`advance`](Self::advance).
    #[inline]
    pub fn is_changed(&self, id: ParamId) -> bool {
        self.changed[id.index()]
    }

    /// Current value of `id` if it changed on the last advance.
    #[inline]
    pub fn changed(&self, id: ParamId) -> Option<f32> {
        self.changed[id.index()].then(|| self.get(id))
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.params[id.index()].get()
    }

    /// Current target.
    #[inline]
    pub fn target(&self, id: ParamId) -> f32 {
        self.params[id.index()].target()
    }

    /// Jumps every parameter to its target.
    pub fn snap_to_targets(&mut self) {
        for param in &mut self.params {
            param.snap_to_target();
        }
    }

    /// Flags every parameter as changed, forcing a full dispatch.
    pub fn mark_all_changed(&mut self) {
        self.changed = [true; PARAM_COUNT];
    }

    /// Clears every change flag.
    pub fn clear_changed(&mut self) {
        self.changed = [false; PARAM_COUNT];
    }
}
