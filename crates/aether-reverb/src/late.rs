//! Late reverberation network.
//!
//! Up to [`MAX_LINES`] modulated feedback delay lines run at double
//! precision. Each line owns its own allpass diffuser and damping cascade,
//! both inside the feedback loop:
//!
//! ```text
//!            ┌────────────────────────────────────────────┐
//!            v                                            │ × feedback
//! in ──> [ delay ] ──> [ diffuser ] ──> [ damping ] ──┬───┘
//!        (modulated)                                  └──> out
//! ```
//!
//! # Topologies
//!
//! - [`LateOrder::Parallel`]: every line is fed the network input
//! - [`LateOrder::Series`]: line `i` is fed the network input plus line
//!   `i - 1`'s output of the same sample, each scaled by `1/√2`
//!
//! In both cases the network output is the sum of the active lines scaled by
//! `1/√n`, and each line's feed is scaled by `√(1 - g²)` so the steady-state
//! energy of a line does not grow with its feedback `g`.
//!
//! # Modulation
//!
//! Line reads and diffuser stages are swept with [`Sweep`]: the read only
//! ever lengthens the base delay, the depth is capped so the read never moves
//! faster than [`MAX_SWEEP_SLOPE`](aether_core::MAX_SWEEP_SLOPE) samples per
//! sample, and the read gain follows the read speed. With every allpass
//! lossless and the line gain clamped to [`MAX_FEEDBACK`], the loop gain
//! stays below 1 at any modulation setting.

use core::f64::consts::FRAC_1_SQRT_2;

use aether_core::{
    Biquad, Lowpass6dB, RingBuffer, Sample, SeedTable, Sweep, high_shelf_coefficients,
    low_shelf_coefficients,
};
use libm::sqrt;

use crate::diffuser::{AllpassDiffuser, DiffuserSettings, MAX_FEEDBACK};

/// Maximum number of delay lines.
pub const MAX_LINES: usize = 12;

/// Longest base line delay.
pub const MAX_LINE_DELAY_MS: f32 = 1000.0;

/// Largest line modulation excursion.
pub const MAX_LINE_MOD_DEPTH_MS: f32 = 50.0;

/// Seed domain salt for line lengths and phases.
const DELAY_SALT: u64 = 0xDE1A_0003;

/// Seed domain salt for the first line's diffuser; later lines step from it.
const LATE_DIFFUSION_SALT: u64 = 0x1A7E_0004;
const LINE_SALT_STRIDE: u64 = 0x9E37_79B9;

/// Routing between the late delay lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LateOrder {
    /// All lines fed from the network input.
    #[default]
    Parallel,
    /// Each line also fed from the previous line's output.
    Series,
}

impl LateOrder {
    /// Maps the `late_order` selector: 0 is parallel, anything else series.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => LateOrder::Parallel,
            _ => LateOrder::Series,
        }
    }
}

/// Which damping filters run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DampingSettings {
    /// Low shelf on.
    pub low_shelf: bool,
    /// High shelf on.
    pub high_shelf: bool,
    /// Lowpass on.
    pub high_cut: bool,
}

/// Per-sample late network configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateSettings {
    /// Line routing.
    pub order: LateOrder,
    /// Configuration of every line's diffuser.
    pub diffuser: DiffuserSettings,
    /// Damping filter enables.
    pub damping: DampingSettings,
}

impl Default for LateSettings {
    fn default() -> Self {
        Self {
            order: LateOrder::Parallel,
            diffuser: DiffuserSettings::default(),
            damping: DampingSettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Damping {
    low_shelf: Biquad<f64>,
    high_shelf: Biquad<f64>,
    high_cut: Lowpass6dB<f64>,
}

impl Damping {
    #[inline]
    fn process(&mut self, input: f64, settings: &DampingSettings) -> f64 {
        let mut x = input;
        if settings.low_shelf {
            x = self.low_shelf.process(x);
        }
        if settings.high_shelf {
            x = self.high_shelf.process(x);
        }
        if settings.high_cut {
            x = self.high_cut.process(x);
        }
        x
    }

    fn clear(&mut self) {
        self.low_shelf.clear();
        self.high_shelf.clear();
        self.high_cut.reset();
    }
}

#[derive(Debug, Clone)]
struct DelayLine {
    buffer: RingBuffer<f64>,
    sweep: Sweep,
    diffuser: AllpassDiffuser<f64>,
    damping: Damping,
}

impl DelayLine {
    fn new(sample_rate: f32, index: usize) -> Self {
        let salt = LATE_DIFFUSION_SALT.wrapping_add(LINE_SALT_STRIDE.wrapping_mul(index as u64));
        Self {
            buffer: RingBuffer::for_duration(sample_rate, MAX_LINE_DELAY_MS + MAX_LINE_MOD_DEPTH_MS, 2),
            sweep: Sweep::default(),
            diffuser: AllpassDiffuser::new(sample_rate, salt),
            damping: Damping {
                low_shelf: Biquad::new(),
                high_shelf: Biquad::new(),
                high_cut: Lowpass6dB::new(sample_rate, 20000.0),
            },
        }
    }

    /// Reads the line, runs diffusion and damping, then writes `feed` plus
    /// the recirculated output.
    #[inline]
    fn process(&mut self, feed: f64, delay: f64, mod_depth: f64, feedback: f64, settings: &LateSettings) -> f64 {
        let (offset, gain) = self.sweep.next(mod_depth);
        // Read precedes the write, so tap 0 is already one sample old
        let delayed = self.buffer.tap_linear(delay + offset - 1.0) * gain;
        let diffused = self.diffuser.process(delayed, &settings.diffuser);
        let out = self.damping.process(diffused, &settings.damping);
        self.buffer.push((feed + feedback * out).flush_denormal());
        out
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.diffuser.clear();
        self.damping.clear();
    }
}

/// One channel of the late network.
///
/// # Example
///
/// ```rust
/// use aether_reverb::{LateReverb, LateSettings};
///
/// let mut late = LateReverb::new(48000.0);
/// late.set_delay_lines(4);
/// late.set_delay(4800.0);
/// late.set_feedback(0.8);
///
/// let settings = LateSettings::default();
/// let mut energy = 0.0;
/// for n in 0..48000 {
///     let y = late.process(if n == 0 { 1.0 } else { 0.0 }, &settings);
///     energy += y * y;
/// }
/// assert!(energy > 0.0 && energy.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct LateReverb {
    lines: [DelayLine; MAX_LINES],
    /// Line delay factors in `0..MAX_LINES`, LFO phases above.
    seeds: SeedTable<{ 2 * MAX_LINES }>,
    weight: f64,
    factors: [f64; MAX_LINES],
    active: usize,
    sample_rate: f32,
    /// Base line delay in samples.
    delay: f64,
    /// Line modulation depth in samples.
    mod_depth: f64,
    feedback: f64,
    low_shelf: (f32, f32),
    high_shelf: (f32, f32),
}

impl LateReverb {
    /// Creates a network at `sample_rate` with one active line.
    pub fn new(sample_rate: f32) -> Self {
        let mut late = Self {
            lines: core::array::from_fn(|i| DelayLine::new(sample_rate, i)),
            seeds: SeedTable::new(DELAY_SALT, 1),
            weight: 0.0,
            factors: [1.0; MAX_LINES],
            active: 1,
            sample_rate,
            delay: 1.0,
            mod_depth: 0.0,
            feedback: 0.0,
            low_shelf: (100.0, 1.0),
            high_shelf: (1500.0, 1.0),
        };
        late.update_factors();
        late.update_phases();
        late.update_shelves();
        late
    }

    /// Sets the number of active lines (clamped to `1..=MAX_LINES`).
    ///
    /// Lines that become active start from silence.
    pub fn set_delay_lines(&mut self, count: usize) {
        let count = count.clamp(1, MAX_LINES);
        for line in &mut self.lines[self.active.min(count)..count] {
            line.clear();
        }
        self.active = count;
    }

    /// Number of active lines.
    pub fn delay_lines(&self) -> usize {
        self.active
    }

    /// Sets the base line delay in samples.
    pub fn set_delay(&mut self, samples: f64) {
        self.delay = samples.max(1.0);
    }

    /// Sets the line modulation depth in samples.
    ///
    /// At fast rates the depth in effect is capped by
    /// [`Sweep::depth_limit`].
    pub fn set_mod_depth(&mut self, samples: f64) {
        self.mod_depth = samples.max(0.0);
    }

    /// Sets the line modulation rate in cycles per sample.
    pub fn set_mod_rate(&mut self, rate: f64) {
        for line in &mut self.lines {
            line.sweep.set_rate(rate);
        }
    }

    /// Sets the line feedback, clamped to `[0, MAX_FEEDBACK]`.
    pub fn set_feedback(&mut self, feedback: f64) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    /// Regenerates line lengths and LFO phases from `seed`.
    pub fn set_delay_seed(&mut self, seed: u64) {
        self.seeds.reseed(seed);
        self.update_factors();
        self.update_phases();
    }

    /// Reseeds every line's diffuser.
    pub fn set_diffusion_seed(&mut self, seed: u64) {
        for line in &mut self.lines {
            line.diffuser.set_seed(seed);
        }
    }

    /// Sets this channel's weight between the two seed streams, for line
    /// lengths and every diffuser.
    pub fn set_seed_crossmix(&mut self, weight: f64) {
        self.weight = weight.clamp(0.0, 1.0);
        self.update_factors();
        for line in &mut self.lines {
            line.diffuser.set_seed_crossmix(self.weight);
        }
    }

    /// Base stage delay of every diffuser, in samples.
    pub fn set_diffusion_delay(&mut self, samples: f64) {
        for line in &mut self.lines {
            line.diffuser.set_delay(samples);
        }
    }

    /// Diffuser modulation depth, in samples.
    pub fn set_diffusion_mod_depth(&mut self, samples: f64) {
        for line in &mut self.lines {
            line.diffuser.set_mod_depth(samples);
        }
    }

    /// Diffuser modulation rate, in cycles per sample.
    pub fn set_diffusion_mod_rate(&mut self, rate: f64) {
        for line in &mut self.lines {
            line.diffuser.set_mod_rate(rate);
        }
    }

    /// Diffuser input drive (linear, 0 = off).
    pub fn set_diffusion_drive(&mut self, drive: f64) {
        for line in &mut self.lines {
            line.diffuser.set_drive(drive);
        }
    }

    /// Low shelf corner in Hz.
    pub fn set_low_shelf_cutoff(&mut self, hz: f32) {
        self.low_shelf.0 = hz;
        self.update_shelves();
    }

    /// Low shelf gain in dB.
    pub fn set_low_shelf_gain(&mut self, db: f32) {
        self.low_shelf.1 = aether_core::db_to_linear(db);
        self.update_shelves();
    }

    /// High shelf corner in Hz.
    pub fn set_high_shelf_cutoff(&mut self, hz: f32) {
        self.high_shelf.0 = hz;
        self.update_shelves();
    }

    /// High shelf gain in dB.
    pub fn set_high_shelf_gain(&mut self, db: f32) {
        self.high_shelf.1 = aether_core::db_to_linear(db);
        self.update_shelves();
    }

    /// Lowpass cutoff in Hz.
    pub fn set_high_cut(&mut self, hz: f32) {
        for line in &mut self.lines {
            line.damping.high_cut.set_cutoff(hz);
        }
    }

    /// Processes one sample through the active lines.
    #[inline]
    pub fn process(&mut self, input: f64, settings: &LateSettings) -> f64 {
        let active = self.active;
        let feedback = self.feedback;
        let input_gain = sqrt(1.0 - feedback * feedback);
        let mut previous = 0.0;
        let mut sum = 0.0;

        for (line, &factor) in self.lines[..active].iter_mut().zip(&self.factors) {
            let feed = match settings.order {
                LateOrder::Parallel => input,
                LateOrder::Series => (input + previous) * FRAC_1_SQRT_2,
            };
            let out = line.process(
                feed * input_gain,
                self.delay * factor,
                self.mod_depth,
                feedback,
                settings,
            );
            previous = out;
            sum += out;
        }
        sum / sqrt(active as f64)
    }

    /// Clears every line, restarting modulation at the seeded phases.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.update_phases();
    }

    fn update_factors(&mut self) {
        for (i, factor) in self.factors.iter_mut().enumerate() {
            *factor = 0.5 + 0.5 * self.seeds.value(i, self.weight);
        }
    }

    fn update_phases(&mut self) {
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.sweep.set_phase(self.seeds.value(MAX_LINES + i, self.weight));
        }
    }

    fn update_shelves(&mut self) {
        let low = low_shelf_coefficients(self.low_shelf.0, f64::from(self.low_shelf.1), self.sample_rate);
        let high = high_shelf_coefficients(self.high_shelf.0, f64::from(self.high_shelf.1), self.sample_rate);
        for line in &mut self.lines {
            line.damping.low_shelf.set_coefficients(low);
            line.damping.high_shelf.set_coefficients(high);
        }
    }
}
