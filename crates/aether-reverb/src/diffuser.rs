//! Chain of modulated allpass stages with optional input drive.
//!
//! The same diffuser runs in the early path at single precision and inside
//! every late delay line at double precision. Stage lengths are the base
//! delay scaled by seeded factors in `[0.5, 1]`; stage LFO phases come from
//! the same seed domain so that identical seeds give identical motion.
//!
//! Lowering the stage count simply stops processing the upper stages. Their
//! buffers keep whatever they held, so raising the count again resumes them
//! instead of switching in a zeroed section.

use aether_core::{ModulatedAllpass, Sample, SeedTable};

/// Maximum number of allpass stages.
pub const MAX_STAGES: usize = 8;

/// Longest base stage delay.
pub const MAX_STAGE_DELAY_MS: f32 = 100.0;

/// Largest modulation excursion.
pub const MAX_MOD_DEPTH_MS: f32 = 3.0;

/// Allpass gains are clamped to this, even when the control reaches 1.0.
pub const MAX_FEEDBACK: f64 = 0.98;

/// Per-sample diffuser configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuserSettings {
    /// Active stage count, clamped to [`MAX_STAGES`].
    pub stages: usize,
    /// Allpass gain shared by every stage.
    pub feedback: f64,
    /// Linear interpolation of fractional read positions.
    pub interpolate: bool,
}

impl Default for DiffuserSettings {
    fn default() -> Self {
        Self {
            stages: MAX_STAGES,
            feedback: 0.7,
            interpolate: true,
        }
    }
}

/// Seeded allpass diffusion chain.
///
/// # Example
///
/// ```rust
/// use aether_reverb::{AllpassDiffuser, DiffuserSettings};
///
/// let mut diffuser = AllpassDiffuser::<f32>::new(48000.0, 0x1);
/// diffuser.set_delay(960.0);
///
/// let settings = DiffuserSettings { stages: 4, feedback: 0.6, interpolate: false };
/// let y = diffuser.process(1.0, &settings);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct AllpassDiffuser<T: Sample> {
    stages: [ModulatedAllpass<T>; MAX_STAGES],
    /// Stage delay factors in `0..MAX_STAGES`, LFO phases above.
    seeds: SeedTable<{ 2 * MAX_STAGES }>,
    weight: f64,
    factors: [f64; MAX_STAGES],
    /// Base stage delay in samples.
    delay: f64,
    /// Modulation depth in samples.
    mod_depth: f64,
    /// Linear drive gain; 0 bypasses the saturator.
    drive: f64,
}

impl<T: Sample> AllpassDiffuser<T> {
    /// Creates a diffuser at `sample_rate` in the seed domain `salt`.
    pub fn new(sample_rate: f32, salt: u64) -> Self {
        let mut diffuser = Self {
            stages: core::array::from_fn(|_| {
                ModulatedAllpass::new(sample_rate, MAX_STAGE_DELAY_MS + MAX_MOD_DEPTH_MS)
            }),
            seeds: SeedTable::new(salt, 1),
            weight: 0.0,
            factors: [1.0; MAX_STAGES],
            delay: 1.0,
            mod_depth: 0.0,
            drive: 0.0,
        };
        diffuser.update_factors();
        diffuser.update_phases();
        diffuser
    }

    /// Sets the base stage delay in samples.
    pub fn set_delay(&mut self, samples: f64) {
        self.delay = samples.max(1.0);
    }

    /// Sets the modulation depth in samples.
    pub fn set_mod_depth(&mut self, samples: f64) {
        self.mod_depth = samples.max(0.0);
    }

    /// Sets the modulation rate in cycles per sample.
    pub fn set_mod_rate(&mut self, rate: f64) {
        for stage in &mut self.stages {
            stage.set_mod_rate(rate);
        }
    }

    /// Sets the linear input drive; 0 disables saturation.
    pub fn set_drive(&mut self, drive: f64) {
        self.drive = drive.max(0.0);
    }

    /// Regenerates stage lengths and LFO phases from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.seeds.reseed(seed);
        self.update_factors();
        self.update_phases();
    }

    /// Sets this channel's weight between the two seed streams.
    ///
    /// Only stage lengths follow the weight continuously; LFO phases are
    /// re-derived on the next reseed or reset.
    pub fn set_seed_crossmix(&mut self, weight: f64) {
        self.weight = weight.clamp(0.0, 1.0);
        self.update_factors();
    }

    /// Processes one sample through the first `settings.stages` stages.
    #[inline]
    pub fn process(&mut self, input: T, settings: &DiffuserSettings) -> T {
        let mut x = input;
        if self.drive > 0.0 {
            let drive = T::from_f64(self.drive);
            x = (drive * x).tanh() * T::from_f64(1.0 / self.drive.max(1.0));
        }

        let feedback = T::from_f64(settings.feedback.clamp(-MAX_FEEDBACK, MAX_FEEDBACK));
        let stages = settings.stages.min(MAX_STAGES);
        for (stage, &factor) in self.stages[..stages].iter_mut().zip(&self.factors) {
            x = stage.process(
                x,
                self.delay * factor,
                self.mod_depth,
                feedback,
                settings.interpolate,
            );
        }
        x
    }

    /// Clears every stage and restarts the LFOs at their seeded phases.
    pub fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
        self.update_phases();
    }

    fn update_factors(&mut self) {
        for (i, factor) in self.factors.iter_mut().enumerate() {
            *factor = 0.5 + 0.5 * self.seeds.value(i, self.weight);
        }
    }

    fn update_phases(&mut self) {
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.set_mod_phase(self.seeds.value(MAX_STAGES + i, self.weight));
        }
    }
}
