//! 6 dB/oct tone cuts.
//!
//! [`Lowpass6dB`] tracks its input with a single pole:
//!
//! ```text
//! y[n] = x[n] + p * (y[n-1] - x[n]),   p = exp(-2π * fc / fs)
//! ```
//!
//! [`Highpass6dB`] subtracts that lowpass from the input, so a matched pair
//! always sums back to the original signal.
//!
//! The reverb uses both for the early low/high cut and the lowpass for the
//! late high cut.
//!
//! ```rust
//! use aether_core::Lowpass6dB;
//!
//! let mut cut = Lowpass6dB::<f32>::new(48000.0, 4000.0);
//! assert!(cut.process(1.0) < 1.0);
//! ```

use crate::Sample;
use core::f64::consts::TAU;
use libm::exp;

const MIN_CUTOFF_HZ: f32 = 1.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Keeps `freq_hz` between 1 Hz and just under Nyquist.
#[inline]
pub(crate) fn clamp_cutoff(freq_hz: f32, sample_rate: f32) -> f32 {
    let upper = (sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF_HZ);
    freq_hz.clamp(MIN_CUTOFF_HZ, upper)
}

/// Single-pole lowpass. The pole sits in [0, 1) for every accepted cutoff.
#[derive(Debug, Clone)]
pub struct Lowpass6dB<T: Sample> {
    y1: T,
    pole: T,
    sample_rate: f32,
    cutoff_hz: f32,
}

impl<T: Sample> Lowpass6dB<T> {
    /// Builds a lowpass at `freq_hz`, clamped to `[1, 0.49 * sample_rate]`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lowpass = Self {
            y1: T::ZERO,
            pole: T::ZERO,
            sample_rate,
            cutoff_hz: MIN_CUTOFF_HZ,
        };
        lowpass.set_cutoff(freq_hz);
        lowpass
    }

    /// Moves the cutoff. Filter memory is kept.
    pub fn set_cutoff(&mut self, freq_hz: f32) {
        self.cutoff_hz = clamp_cutoff(freq_hz, self.sample_rate);
        let normalized = f64::from(self.cutoff_hz) / f64::from(self.sample_rate);
        self.pole = T::from_f64(exp(-TAU * normalized));
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: T) -> T {
        self.y1 = (input + self.pole * (self.y1 - input)).flush_denormal();
        self.y1
    }

    /// Forgets the previous output.
    pub fn reset(&mut self) {
        self.y1 = T::ZERO;
    }
}

/// Input minus a [`Lowpass6dB`] at the same cutoff.
#[derive(Debug, Clone)]
pub struct Highpass6dB<T: Sample> {
    inner: Lowpass6dB<T>,
}

impl<T: Sample> Highpass6dB<T> {
    /// Builds a highpass at `freq_hz` (same clamping as the lowpass).
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            inner: Lowpass6dB::new(sample_rate, freq_hz),
        }
    }

    /// Moves the cutoff.
    pub fn set_cutoff(&mut self, freq_hz: f32) {
        self.inner.set_cutoff(freq_hz);
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: T) -> T {
        input - self.inner.process(input)
    }

    /// Forgets the previous output.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
