//! Sine low-frequency oscillator for delay-time modulation.
//!
//! The rate is expressed in cycles per sample (`hz / sample_rate`), which is
//! the form the engine's control layer already has on hand after converting
//! a rate parameter. Phase is kept in `f64` so that slow rates on long delay
//! lines do not drift audibly over hours of processing.
//!
//! [`Sweep`] turns an LFO into a delay-read offset that is safe inside a
//! feedback loop: the offset only lengthens the delay, its slope is bounded
//! by [`MAX_SWEEP_SLOPE`], and the read gain tracks the read speed so a
//! stretched read carries no more energy than was written.

use core::f64::consts::{PI, TAU};
use libm::{sin, sqrt};

/// Largest change of a swept read position per sample.
///
/// Bounds the pitch deviation of a swept read to ±5%.
pub const MAX_SWEEP_SLOPE: f64 = 0.05;

/// Sine LFO with phase accumulation.
///
/// # Example
///
/// ```rust
/// use aether_core::Lfo;
///
/// let mut lfo = Lfo::new(1.0 / 48000.0); // 1 Hz at 48 kHz
/// let value = lfo.next();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f64,
    /// Phase increment per sample
    rate: f64,
}

impl Lfo {
    /// Creates an LFO running at `rate` cycles per sample.
    pub fn new(rate: f64) -> Self {
        Self { phase: 0.0, rate }
    }

    /// Sets the rate in cycles per sample.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate.max(0.0);
    }

    /// Jumps to `phase` (0.0 - 1.0, wrapped).
    ///
    /// 0.0 = 0°, 0.25 = 90°, 0.5 = 180°, 0.75 = 270°
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase - libm::floor(phase);
    }

    /// Returns the value at the current phase (-1.0 to 1.0) and advances.
    #[inline]
    pub fn next(&mut self) -> f64 {
        let output = sin(self.phase * TAU);
        self.phase += self.rate;
        if self.phase >= 1.0 {
            self.phase -= libm::floor(self.phase);
        }
        output
    }
}

/// One-sided, slope-limited delay modulation.
///
/// [`next`](Sweep::next) returns an offset in `[0, depth]` to add to a base
/// delay, plus the gain to apply to the value read there. The gain is
/// `√(1 - slope)`, where `slope` is the change of the offset since the last
/// sample: reading slower than real time (growing offset) stretches the
/// stored signal and is attenuated, reading faster is boosted by the same
/// rule, so the energy leaving the line matches what was written.
///
/// Depth is capped at `MAX_SWEEP_SLOPE / (π · rate)`, the largest excursion
/// whose sine keeps its slope under [`MAX_SWEEP_SLOPE`].
///
/// ```rust
/// use aether_core::Sweep;
///
/// let mut sweep = Sweep::default();
/// sweep.set_rate(1.0 / 48000.0);
/// for _ in 0..48000 {
///     let (offset, gain) = sweep.next(240.0);
///     assert!((0.0..=240.0).contains(&offset));
///     assert!((gain - 1.0).abs() < 0.03);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    lfo: Lfo,
    /// Offset returned by the previous call.
    offset: f64,
}

impl Sweep {
    /// Sets the rate in cycles per sample.
    pub fn set_rate(&mut self, rate: f64) {
        self.lfo.set_rate(rate);
    }

    /// Jumps to `phase` (0.0 - 1.0, wrapped).
    pub fn set_phase(&mut self, phase: f64) {
        self.lfo.set_phase(phase);
    }

    /// Largest usable depth at the current rate, in samples.
    #[inline]
    pub fn depth_limit(&self) -> f64 {
        if self.lfo.rate > 0.0 {
            MAX_SWEEP_SLOPE / (PI * self.lfo.rate)
        } else {
            f64::INFINITY
        }
    }

    /// Advances one sample; returns the read offset and the read gain.
    ///
    /// `depth` is the peak offset in samples. The LFO advances even at zero
    /// depth so that enabling modulation later resumes in phase.
    #[inline]
    pub fn next(&mut self, depth: f64) -> (f64, f64) {
        let depth = depth.clamp(0.0, self.depth_limit());
        let offset = 0.5 * depth * (1.0 + self.lfo.next());
        // Depth and phase jumps move the offset faster than the sine does
        let slope = (offset - self.offset).clamp(-MAX_SWEEP_SLOPE, MAX_SWEEP_SLOPE);
        self.offset = offset;
        (offset, sqrt(1.0 - slope))
    }
}
