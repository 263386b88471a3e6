//! Fixed-capacity circular sample store.
//!
//! [`RingBuffer`] is the storage underneath every delay structure in the
//! engine. Capacity is fixed at construction from the longest delay the owner
//! can ever request at the configured sample rate; nothing reallocates after
//! that.
//!
//! Reads are expressed as *taps*: `tap(0)` is the most recently pushed
//! sample, `tap(1)` the one before it, and so on. Tap positions beyond the
//! capacity are clamped to the oldest stored sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::Sample;

/// Circular buffer of samples with a single write cursor.
///
/// # Example
///
/// ```rust
/// use aether_core::RingBuffer;
///
/// let mut buf = RingBuffer::<f32>::new(4);
/// buf.push(1.0);
/// buf.push(2.0);
/// assert_eq!(buf.tap(0), 2.0);
/// assert_eq!(buf.tap(1), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Sample> {
    data: Vec<T>,
    /// Index of the most recently written sample.
    head: usize,
}

impl<T: Sample> RingBuffer<T> {
    /// Creates a zeroed buffer holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            data: vec![T::ZERO; capacity],
            head: 0,
        }
    }

    /// Creates a buffer large enough for `max_ms` milliseconds at `sample_rate`,
    /// plus `guard` extra samples for interpolation.
    pub fn for_duration(sample_rate: f32, max_ms: f32, guard: usize) -> Self {
        let samples = libm::ceil(f64::from(max_ms) * 0.001 * f64::from(sample_rate)) as usize;
        Self::new(samples + guard.max(1))
    }

    /// Advances the write cursor and stores `value`, overwriting the oldest sample.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.head += 1;
        if self.head >= self.data.len() {
            self.head = 0;
        }
        self.data[self.head] = value;
    }

    /// Returns the sample pushed `delay` pushes ago (0 = newest).
    ///
    /// `delay` is clamped to `capacity - 1`.
    #[inline]
    pub fn tap(&self, delay: usize) -> T {
        let len = self.data.len();
        let delay = delay.min(len - 1);
        let idx = if delay <= self.head {
            self.head - delay
        } else {
            self.head + len - delay
        };
        self.data[idx]
    }

    /// Reads at a fractional tap position with linear interpolation.
    ///
    /// Negative positions read the newest sample; positions past the end
    /// read the oldest.
    #[inline]
    pub fn tap_linear(&self, position: f64) -> T {
        let max = (self.data.len() - 1) as f64;
        let position = position.clamp(0.0, max);
        let whole = position as usize;
        let frac = T::from_f64(position - whole as f64);
        let a = self.tap(whole);
        let b = self.tap(whole + 1);
        a + (b - a) * frac
    }

    /// Reads at a fractional position, truncating to the nearest older-or-equal
    /// integer tap when `interpolate` is false.
    #[inline]
    pub fn tap_at(&self, position: f64, interpolate: bool) -> T {
        if interpolate {
            self.tap_linear(position)
        } else {
            self.tap(position.max(0.0) as usize)
        }
    }

    /// Zeroes all storage.
    pub fn clear(&mut self) {
        self.data.fill(T::ZERO);
        self.head = 0;
    }

    /// Longest tap position that can be read without clamping.
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.data.len() - 1
    }
}
