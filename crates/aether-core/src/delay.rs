//! Variable-length integer delay.
//!
//! [`Delay`] writes the incoming sample first and then reads `length` samples
//! back, so a length of 0 is a pass-through. The requested length is clamped
//! to the buffer capacity on every call, which lets callers feed it a
//! continuously smoothed parameter without range checks.
//!
//! # Use Cases
//!
//! | Stage | Delay Range | Modulation |
//! |-------|-------------|------------|
//! | Predelay | 0-400ms | No (smoothed length) |
//! | Multitap tap bank | 0-500ms | No |

use crate::{RingBuffer, Sample};

/// Single-tap delay line with a per-call length.
///
/// # Example
///
/// ```rust
/// use aether_core::Delay;
///
/// let mut delay = Delay::<f32>::new(48000.0, 10.0);
/// assert_eq!(delay.push(1.0, 0), 1.0); // zero length passes through
/// assert_eq!(delay.push(0.0, 1), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Delay<T: Sample> {
    buffer: RingBuffer<T>,
}

impl<T: Sample> Delay<T> {
    /// Creates a delay that can hold up to `max_ms` milliseconds at `sample_rate`.
    pub fn new(sample_rate: f32, max_ms: f32) -> Self {
        Self {
            buffer: RingBuffer::for_duration(sample_rate, max_ms, 1),
        }
    }

    /// Pushes `input` and returns the sample from `length` samples ago.
    #[inline]
    pub fn push(&mut self, input: T, length: usize) -> T {
        self.buffer.push(input);
        self.buffer.tap(length.min(self.buffer.max_delay()))
    }

    /// Clears the delay line.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_is_passthrough() {
        let mut delay = Delay::<f32>::new(1000.0, 7.0);
        for i in 0..20 {
            let x = i as f32;
            assert_eq!(delay.push(x, 0), x);
        }
    }

    #[test]
    fn delays_by_requested_length() {
        let mut delay = Delay::<f32>::new(1000.0, 15.0);
        delay.push(1.0, 5);
        for _ in 0..4 {
            assert_eq!(delay.push(0.0, 5), 0.0);
        }
        assert_eq!(delay.push(0.0, 5), 1.0);
    }

    #[test]
    fn length_clamped_to_capacity() {
        let mut delay = Delay::<f32>::new(1000.0, 3.0);
        delay.push(1.0, 1000);
        for _ in 0..2 {
            delay.push(0.0, 1000);
        }
        // max delay is 3 samples
        assert_eq!(delay.push(0.0, 1000), 1.0);
    }

    #[test]
    fn capacity_from_time() {
        let mut delay = Delay::<f64>::new(48000.0, 400.0);
        delay.push(1.0, 19200);
        let out = (0..19200).map(|_| delay.push(0.0, 19200)).last();
        assert_eq!(out, Some(1.0));
    }
}
