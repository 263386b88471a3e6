//! Modulated allpass section for reverb diffusion.
//!
//! An allpass whose delay length is supplied per sample and can be swept by
//! an internal [`Sweep`]. Chaining several of these with unrelated lengths
//! smears an impulse into a dense cloud of echoes without coloring the
//! long-term spectrum.

use libm::sqrt;

use crate::{RingBuffer, Sample, Sweep};

/// Normalized-lattice allpass with a swept, per-sample delay length.
///
/// Difference equations, with `d` the (possibly fractional) delay and
/// `k = √(1 - g²)`:
///
/// ```text
/// w[n] = k * x[n] + g * w[n - d]
/// y[n] = k * w[n - d] - g * x[n]
/// ```
///
/// With a fixed delay this has the same transfer function as the Schroeder
/// form `w = x + g·w[n-d]`, `y = w[n-d] - g·w`. The lattice keeps the state
/// and the output on one rotation, so the section stays lossless while its
/// delay moves. The sweep only lengthens the delay past `d`.
///
/// The delay length is passed on every call rather than stored, so an owner
/// can feed it a smoothed parameter without any bookkeeping here. Lengths
/// beyond the buffer capacity are clamped.
///
/// # Example
///
/// ```rust
/// use aether_core::ModulatedAllpass;
///
/// let mut stage = ModulatedAllpass::<f32>::new(48000.0, 100.0);
/// let first = stage.process(1.0, 480.0, 0.0, 0.5, false);
/// assert_eq!(first, -0.5); // -g * x on the first sample
/// ```
#[derive(Debug, Clone)]
pub struct ModulatedAllpass<T: Sample> {
    buffer: RingBuffer<T>,
    sweep: Sweep,
}

impl<T: Sample> ModulatedAllpass<T> {
    /// Creates a stage able to delay up to `max_ms` at `sample_rate`.
    pub fn new(sample_rate: f32, max_ms: f32) -> Self {
        Self {
            buffer: RingBuffer::for_duration(sample_rate, max_ms, 2),
            sweep: Sweep::default(),
        }
    }

    /// Processes one sample.
    ///
    /// * `delay` - shortest delay length in samples (≥ 1 for a true allpass)
    /// * `mod_depth` - sweep excursion above `delay`, in samples
    /// * `feedback` - allpass gain `g`, expected in `(-1, 1)`
    /// * `interpolate` - linear interpolation of fractional positions; when
    ///   false the position is truncated
    #[inline]
    pub fn process(
        &mut self,
        input: T,
        delay: f64,
        mod_depth: f64,
        feedback: T,
        interpolate: bool,
    ) -> T {
        let (offset, gain) = self.sweep.next(mod_depth);
        // Read happens before this sample's write, so tap 0 is already one sample old.
        let position = (delay + offset - 1.0).max(0.0);
        let delayed = self.buffer.tap_at(position, interpolate) * T::from_f64(gain);
        let g = feedback.to_f64();
        let k = T::from_f64(sqrt((1.0 - g * g).max(0.0)));
        self.buffer.push((k * input + feedback * delayed).flush_denormal());
        k * delayed - feedback * input
    }

    /// Sets the sweep rate in cycles per sample.
    pub fn set_mod_rate(&mut self, rate: f64) {
        self.sweep.set_rate(rate);
    }

    /// Sets the sweep phase (0.0 - 1.0).
    pub fn set_mod_phase(&mut self, phase: f64) {
        self.sweep.set_phase(phase);
    }

    /// Clears the delay memory. The sweep keeps running from its current phase.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
