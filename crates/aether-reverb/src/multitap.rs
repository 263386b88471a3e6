//! Seeded multitap delay for the early reflection pattern.
//!
//! Up to [`MAX_TAPS`] taps read one shared buffer. Each tap's position is a
//! seeded fraction of the current tap length, so changing the length
//! stretches the pattern without regenerating it. Gains fall off
//! exponentially with position, controlled by the decay amount.

use aether_core::{RingBuffer, SeedTable};
use libm::{exp, sqrt};

/// Maximum number of taps.
pub const MAX_TAPS: usize = 50;

/// Longest tap length the buffer holds.
pub const MAX_TAP_LENGTH_MS: f32 = 500.0;

/// Gain of the last tap at decay 1.0 is `exp(-DECAY_STEEPNESS)`.
const DECAY_STEEPNESS: f64 = 6.0;

/// Seed domain salt for tap positions.
const TAP_SALT: u64 = 0x7A9E_0001;

/// Bank of seeded, decaying taps over a single buffer.
///
/// # Example
///
/// ```rust
/// use aether_reverb::MultitapDelay;
///
/// let mut taps = MultitapDelay::new(48000.0);
/// taps.set_seed(7);
/// taps.set_decay(0.5);
///
/// let first = taps.process(1.0, 12, 9600.0);
/// assert!(first.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct MultitapDelay {
    buffer: RingBuffer<f32>,
    seeds: SeedTable<MAX_TAPS>,
    weight: f64,
    decay: f64,
    /// Tap positions as a fraction of the tap length, in `[0, 1)`.
    positions: [f64; MAX_TAPS],
    gains: [f32; MAX_TAPS],
    /// `norms[n - 1]` makes the first `n` taps sum to unit energy.
    norms: [f32; MAX_TAPS],
}

impl MultitapDelay {
    /// Creates a multitap sized for [`MAX_TAP_LENGTH_MS`] at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut multitap = Self {
            buffer: RingBuffer::for_duration(sample_rate, MAX_TAP_LENGTH_MS, 2),
            seeds: SeedTable::new(TAP_SALT, 1),
            weight: 0.0,
            decay: 0.0,
            positions: [0.0; MAX_TAPS],
            gains: [1.0; MAX_TAPS],
            norms: [1.0; MAX_TAPS],
        };
        multitap.update_taps();
        multitap
    }

    /// Regenerates the tap pattern from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.seeds.reseed(seed);
        self.update_taps();
    }

    /// Sets this channel's weight between the two seed streams.
    pub fn set_seed_crossmix(&mut self, weight: f64) {
        self.weight = weight.clamp(0.0, 1.0);
        self.update_taps();
    }

    /// Sets the gain decay across the pattern (0 = uniform, 1 = steep).
    pub fn set_decay(&mut self, decay: f64) {
        self.decay = decay.clamp(0.0, 1.0);
        self.update_gains();
    }

    /// Pushes `input` and returns the sum of the first `taps` taps.
    ///
    /// `taps` is clamped to `1..=MAX_TAPS`; `length` is in samples.
    #[inline]
    pub fn process(&mut self, input: f32, taps: usize, length: f32) -> f32 {
        self.buffer.push(input);
        let taps = taps.clamp(1, MAX_TAPS);
        let length = f64::from(length.max(0.0));
        let mut sum = 0.0;
        for (&position, &gain) in self.positions[..taps].iter().zip(&self.gains[..taps]) {
            sum += gain * self.buffer.tap_linear(position * length);
        }
        sum * self.norms[taps - 1]
    }

    /// Clears the buffer. The pattern is kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn update_taps(&mut self) {
        for (i, position) in self.positions.iter_mut().enumerate() {
            *position = self.seeds.value(i, self.weight);
        }
        self.update_gains();
    }

    fn update_gains(&mut self) {
        let mut energy = 0.0;
        for i in 0..MAX_TAPS {
            let gain = exp(-DECAY_STEEPNESS * self.decay * self.positions[i]);
            self.gains[i] = gain as f32;
            energy += gain * gain;
            self.norms[i] = (1.0 / sqrt(energy)) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_response(taps: &mut MultitapDelay, count: usize, length: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| taps.process(if i == 0 { 1.0 } else { 0.0 }, count, length))
            .collect()
    }

    #[test]
    fn positions_in_unit_interval() {
        let mut taps = MultitapDelay::new(48000.0);
        taps.set_seed(1234);
        for i in 0..MAX_TAPS {
            assert!((0.0..1.0).contains(&taps.positions[i]));
        }
    }

    #[test]
    fn zero_decay_is_uniform() {
        let mut taps = MultitapDelay::new(48000.0);
        taps.set_decay(0.0);
        for i in 0..MAX_TAPS {
            assert_eq!(taps.gains[i], 1.0);
        }
    }

    #[test]
    fn decay_falls_with_position() {
        let mut taps = MultitapDelay::new(48000.0);
        taps.set_decay(1.0);
        for i in 0..MAX_TAPS {
            for j in 0..MAX_TAPS {
                if taps.positions[i] < taps.positions[j] {
                    assert!(taps.gains[i] >= taps.gains[j]);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_pattern() {
        let mut a = MultitapDelay::new(48000.0);
        let mut b = MultitapDelay::new(48000.0);
        a.set_seed(99);
        b.set_seed(5);
        b.set_seed(99);
        let ra = impulse_response(&mut a, 12, 4800.0, 5000);
        let rb = impulse_response(&mut b, 12, 4800.0, 5000);
        assert_eq!(ra, rb);

        let mut c = MultitapDelay::new(48000.0);
        c.set_seed(100);
        assert_ne!(ra, impulse_response(&mut c, 12, 4800.0, 5000));
    }

    #[test]
    fn impulse_energy_is_normalized() {
        let mut taps = MultitapDelay::new(48000.0);
        taps.set_seed(3);
        taps.set_decay(0.5);
        let response = impulse_response(&mut taps, 20, 9600.0, 10000);
        let energy: f32 = response.iter().map(|x| x * x).sum();
        // Interpolation spreads taps over two samples; neighbouring taps can add a little
        assert!(energy < 1.2 && energy > 0.3, "energy = {energy}");
    }

    #[test]
    fn output_stays_inside_tap_length() {
        let mut taps = MultitapDelay::new(48000.0);
        let response = impulse_response(&mut taps, 50, 480.0, 2000);
        assert!(response[482..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn crossmix_weight_moves_pattern() {
        let mut a = MultitapDelay::new(48000.0);
        let mut b = MultitapDelay::new(48000.0);
        a.set_seed_crossmix(0.5);
        b.set_seed_crossmix(0.5);
        assert_eq!(a.positions[0], b.positions[0]);
        b.set_seed_crossmix(1.0);
        assert_ne!(a.positions[0], b.positions[0]);
    }
}
