//! Per-sample parameter smoothing with change reporting.
//!
//! Audio parameters (levels, delay times, feedback) need smooth transitions
//! to avoid audible "zipper noise" when values change. [`SmoothedParam`]
//! tracks a target with a one-pole exponential approach and reports, on every
//! step, whether its value actually moved. Callers use that report to skip
//! recomputing filter coefficients or reseeding structures on samples where
//! nothing changed.
//!
//! ## Usage
//!
//! ```rust
//! use aether_core::SmoothedParam;
//!
//! let mut level = SmoothedParam::with_config(1.0, 48000.0, 5.0);
//! level.set_target(0.5);
//!
//! // In the audio loop, advance once per sample
//! let mut moved = false;
//! for _ in 0..480 {
//!     moved |= level.advance();
//! }
//! assert!(moved);
//! assert!(level.get() < 0.6);
//! ```

use core::f64::consts::TAU;
use libm::exp;

/// A parameter with built-in exponential smoothing.
///
/// The update per sample is
///
/// ```text
/// value = target - coeff * (target - value)
/// coeff = exp(-2π / (t * sample_rate))
/// ```
///
/// with `t` the smoothing time in seconds. A smoothing time of 0 gives
/// `coeff = 0`: the value jumps to the target on the next step.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    value: f32,
    target: f32,
    /// Per-sample retention in `[0, 1)`; 0 jumps.
    coeff: f32,
    sample_rate: f32,
    smoothing_ms: f32,
}

impl SmoothedParam {
    /// Starts at `initial` (already settled) with the given smoothing time.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_ms: f32) -> Self {
        Self {
            value: initial,
            target: initial,
            coeff: retention(smoothing_ms, sample_rate),
            sample_rate,
            smoothing_ms,
        }
    }

    /// Moves the target; the value follows on subsequent [`advance`](Self::advance) calls.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Recomputes the coefficient for `sample_rate`, keeping value and target.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.coeff = retention(self.smoothing_ms, sample_rate);
    }

    /// Steps one sample toward the target. Returns `true` if the value moved.
    #[inline]
    pub fn advance(&mut self) -> bool {
        let next = self.target - self.coeff * (self.target - self.value);
        let moved = next != self.value;
        self.value = next;
        moved
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jumps straight to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.value = self.target;
    }
}

/// `exp(-2π / (t * sample_rate))`, or 0 when smoothing is off.
fn retention(smoothing_ms: f32, sample_rate: f32) -> f32 {
    if smoothing_ms <= 0.0 || sample_rate <= 0.0 {
        return 0.0;
    }
    let samples = f64::from(smoothing_ms) / 1000.0 * f64::from(sample_rate);
    exp(-TAU / samples) as f32
}
