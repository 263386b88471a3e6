//! Stereo width matrix followed by a per-channel predelay.

use aether_core::Delay;

/// Longest predelay the unit can produce.
pub const MAX_PREDELAY_MS: f32 = 400.0;

/// Width blend and variable integer delay, one line per channel.
///
/// Width 1.0 leaves the channels untouched; width 0.0 folds both to their
/// mid signal. The blend runs before the delay so the early path sees the
/// narrowed image too.
#[derive(Debug, Clone)]
pub struct Predelay {
    left: Delay<f32>,
    right: Delay<f32>,
    sample_rate: f32,
}

impl Predelay {
    /// Creates a predelay sized for [`MAX_PREDELAY_MS`] at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            left: Delay::new(sample_rate, MAX_PREDELAY_MS),
            right: Delay::new(sample_rate, MAX_PREDELAY_MS),
            sample_rate,
        }
    }

    /// Processes one stereo frame.
    ///
    /// `width` is in `[0, 1]`; `predelay_ms` is converted to whole samples
    /// and clamped to the buffer.
    #[inline]
    pub fn process(&mut self, left: f32, right: f32, width: f32, predelay_ms: f32) -> (f32, f32) {
        let blend = 0.5 - 0.5 * width;
        let side = blend * (right - left);
        let length = (predelay_ms / 1000.0 * self.sample_rate).max(0.0) as usize;
        (
            self.left.push(left + side, length),
            self.right.push(right - side, length),
        )
    }

    /// Clears both lines.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}
