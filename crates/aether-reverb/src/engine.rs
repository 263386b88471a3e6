//! The stereo reverb engine.
//!
//! Signal flow, per channel:
//!
//! ```text
//! in ──┬───────────────────────────────────────────────── × dry ──────┐
//!      └─> width ─> predelay ─┬────────────────────── × predelay ─────┤
//!                             └─> early ─┬──────────── × early ───────┤ sum ─> mix ─> out
//!                                        └─> late ──── × late ────────┘
//! ```
//!
//! Each block starts by pulling targets from the [`ParamPorts`]. Every
//! sample then advances the smoothers, dispatches changed values into the
//! components, and runs the frame.

use aether_core::{db_to_linear, hz_to_rate, ms_to_samples, wet_dry_mix};

use crate::control::ParamBank;
use crate::diffuser::DiffuserSettings;
use crate::early::{EarlyReflections, EarlySettings};
use crate::error::check_sample_rate;
use crate::late::{DampingSettings, LateOrder, LateReverb, LateSettings};
use crate::params::{ParamId, ParamPorts};
use crate::predelay::Predelay;
use crate::ReverbError;

/// Drive at or below this is treated as "saturation off".
const DRIVE_OFF_DB: f32 = -12.0;

/// Linear drive for a drive control in dB; the bottom of the range is off.
fn drive_gain(db: f32) -> f64 {
    if db <= DRIVE_OFF_DB {
        0.0
    } else {
        f64::from(db_to_linear(db))
    }
}

/// Seed stream weights for the left and right channel.
///
/// At crossmix 100 both channels use the same blend and share their
/// structure; at 0 they sit on opposite streams.
fn seed_weights(crossmix: f32) -> [f64; 2] {
    let c = f64::from(crossmix) / 100.0;
    [1.0 - c / 2.0, c / 2.0]
}

#[derive(Debug, Clone)]
struct Channel {
    early: EarlyReflections,
    late: LateReverb,
}

impl Channel {
    fn new(sample_rate: f32) -> Self {
        Self {
            early: EarlyReflections::new(sample_rate),
            late: LateReverb::new(sample_rate),
        }
    }

    fn clear(&mut self) {
        self.early.clear();
        self.late.clear();
    }
}

/// Stereo algorithmic reverb.
///
/// Owns every buffer it uses; nothing allocates after construction (or
/// after [`rebuild`](Self::rebuild)).
///
/// # Example
///
/// ```rust
/// use aether_reverb::{AetherReverb, ReverbParams};
///
/// let mut reverb = AetherReverb::new(48000.0);
/// let mut params = ReverbParams::default();
/// params.late_delay_line_feedback = 0.85;
///
/// let input = [1.0f32; 64];
/// let mut left = [0.0f32; 64];
/// let mut right = [0.0f32; 64];
///
/// reverb.prepare(&params.ports());
/// reverb.process(64, &params.ports(), &input, &input, &mut left, &mut right);
/// assert!(left.iter().chain(&right).all(|x| x.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct AetherReverb {
    sample_rate: f32,
    bank: ParamBank,
    predelay: Predelay,
    channels: [Channel; 2],
}

impl AetherReverb {
    /// Builds an engine at `sample_rate` with every parameter at its default.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not finite and positive. Use
    /// [`try_new`](Self::try_new) to handle that case.
    pub fn new(sample_rate: f32) -> Self {
        Self::try_new(sample_rate).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Builds an engine, rejecting an invalid sample rate.
    pub fn try_new(sample_rate: f32) -> Result<Self, ReverbError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut engine = Self {
            sample_rate,
            bank: ParamBank::new(sample_rate),
            predelay: Predelay::new(sample_rate),
            channels: [Channel::new(sample_rate), Channel::new(sample_rate)],
        };
        engine.apply_changes();
        engine.bank.clear_changed();
        #[cfg(feature = "tracing")]
        tracing::debug!("reverb_build: {sample_rate} Hz");
        Ok(engine)
    }

    /// Reallocates every buffer for `sample_rate`.
    ///
    /// Parameter values and targets carry over; smoothing coefficients,
    /// delay capacities, and filter coefficients are recomputed, and all
    /// audio state starts from silence.
    pub fn rebuild(&mut self, sample_rate: f32) -> Result<(), ReverbError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        self.bank.set_sample_rate(sample_rate);
        self.predelay = Predelay::new(sample_rate);
        self.channels = [Channel::new(sample_rate), Channel::new(sample_rate)];
        self.bank.mark_all_changed();
        self.apply_changes();
        self.bank.clear_changed();
        #[cfg(feature = "tracing")]
        tracing::debug!("reverb_rebuild: {sample_rate} Hz");
        Ok(())
    }

    /// Rebuilds only if `sample_rate` differs from the current rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), ReverbError> {
        if sample_rate == self.sample_rate {
            return Ok(());
        }
        self.rebuild(sample_rate)
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Loads the ports without smoothing: every parameter jumps to its
    /// target and every component is reconfigured.
    pub fn prepare(&mut self, ports: &ParamPorts<'_>) {
        self.bank.refresh_targets(ports);
        self.bank.snap_to_targets();
        self.bank.mark_all_changed();
        self.apply_changes();
        self.bank.clear_changed();
        #[cfg(feature = "tracing")]
        tracing::debug!("reverb_prepare: {} lines", self.param(ParamId::LateDelayLines));
    }

    /// Clears all audio state. Parameters are untouched.
    pub fn reset(&mut self) {
        self.predelay.clear();
        for channel in &mut self.channels {
            channel.clear();
        }
    }

    /// Current smoothed value of a parameter.
    pub fn param(&self, id: ParamId) -> f32 {
        self.bank.get(id)
    }

    /// Target a parameter is smoothing toward.
    pub fn target(&self, id: ParamId) -> f32 {
        self.bank.target(id)
    }

    /// Processes a block.
    ///
    /// Reads targets from `ports`, then writes `frames` samples to both
    /// outputs, overwriting them. `frames` is clamped to the shortest
    /// buffer; the number of frames written is returned.
    pub fn process(
        &mut self,
        frames: usize,
        ports: &ParamPorts<'_>,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) -> usize {
        self.bank.refresh_targets(ports);
        let frames = frames
            .min(in_left.len())
            .min(in_right.len())
            .min(out_left.len())
            .min(out_right.len());
        for i in 0..frames {
            let (left, right) = self.process_frame(in_left[i], in_right[i]);
            out_left[i] = left;
            out_right[i] = right;
        }
        frames
    }

    /// Advances parameters by one sample and processes one stereo frame.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        if self.bank.advance() {
            self.apply_changes();
        }

        let p = &self.bank;
        let percent = |id| p.get(id) / 100.0;
        let dry_level = percent(ParamId::DryLevel);
        let predelay_level = percent(ParamId::PredelayLevel);
        let early_level = percent(ParamId::EarlyLevel);
        let late_level = percent(ParamId::LateLevel);
        let mix = percent(ParamId::Mix);

        let early_settings = EarlySettings {
            low_cut: p.get(ParamId::EarlyLowCutEnabled) > 0.0,
            high_cut: p.get(ParamId::EarlyHighCutEnabled) > 0.0,
            taps: p.get(ParamId::EarlyTaps) as usize,
            tap_length: p.get(ParamId::EarlyTapLength) / 1000.0 * self.sample_rate,
            tap_mix: percent(ParamId::EarlyTapMix),
            diffuser: DiffuserSettings {
                stages: p.get(ParamId::EarlyDiffusionStages) as usize,
                feedback: f64::from(p.get(ParamId::EarlyDiffusionFeedback)),
                interpolate: true,
            },
        };
        let late_settings = LateSettings {
            order: LateOrder::from_index(p.get(ParamId::LateOrder) as usize),
            diffuser: DiffuserSettings {
                stages: p.get(ParamId::LateDiffusionStages) as usize,
                feedback: f64::from(p.get(ParamId::LateDiffusionFeedback)),
                interpolate: p.get(ParamId::Interpolate) > 0.0,
            },
            damping: DampingSettings {
                low_shelf: p.get(ParamId::LateLowShelfEnabled) > 0.0,
                high_shelf: p.get(ParamId::LateHighShelfEnabled) > 0.0,
                high_cut: p.get(ParamId::LateHighCutEnabled) > 0.0,
            },
        };

        let (pre_left, pre_right) = self.predelay.process(
            left,
            right,
            percent(ParamId::Width),
            p.get(ParamId::Predelay),
        );

        let mut frame = [0.0f32; 2];
        for ((channel, out), (dry, pre)) in self
            .channels
            .iter_mut()
            .zip(frame.iter_mut())
            .zip([(left, pre_left), (right, pre_right)])
        {
            let early = channel.early.process(pre, &early_settings);
            let late = channel.late.process(f64::from(early), &late_settings) as f32;
            let wet = dry_level * dry
                + predelay_level * pre
                + early_level * early
                + late_level * late;
            *out = wet_dry_mix(dry, wet, mix);
        }
        (frame[0], frame[1])
    }

    /// Pushes every changed parameter into the components that use it.
    fn apply_changes(&mut self) {
        let Self {
            sample_rate,
            bank,
            channels,
            ..
        } = self;
        let sample_rate = *sample_rate;
        let samples = |ms: f32| ms_to_samples(ms, sample_rate);
        let rate = |hz: f32| hz_to_rate(hz, sample_rate);

        // Crossmix goes first so reseeds below derive phases at the new weights
        if let Some(crossmix) = bank.changed(ParamId::SeedCrossmix) {
            for (channel, weight) in channels.iter_mut().zip(seed_weights(crossmix)) {
                channel.early.multitap_mut().set_seed_crossmix(weight);
                channel.early.diffuser_mut().set_seed_crossmix(weight);
                channel.late.set_seed_crossmix(weight);
            }
        }

        for channel in channels.iter_mut() {
            let early = &mut channel.early;
            if let Some(hz) = bank.changed(ParamId::EarlyLowCutCutoff) {
                early.set_low_cut(hz);
            }
            if let Some(hz) = bank.changed(ParamId::EarlyHighCutCutoff) {
                early.set_high_cut(hz);
            }

            let multitap = early.multitap_mut();
            if let Some(decay) = bank.changed(ParamId::EarlyTapDecay) {
                multitap.set_decay(f64::from(decay));
            }
            if let Some(seed) = bank.changed(ParamId::TapSeed) {
                multitap.set_seed(seed as u64);
            }

            let diffuser = early.diffuser_mut();
            if let Some(db) = bank.changed(ParamId::EarlyDiffusionDrive) {
                diffuser.set_drive(drive_gain(db));
            }
            if let Some(ms) = bank.changed(ParamId::EarlyDiffusionDelay) {
                diffuser.set_delay(samples(ms));
            }
            if let Some(ms) = bank.changed(ParamId::EarlyDiffusionModDepth) {
                diffuser.set_mod_depth(samples(ms));
            }
            if let Some(hz) = bank.changed(ParamId::EarlyDiffusionModRate) {
                diffuser.set_mod_rate(rate(hz));
            }
            if let Some(seed) = bank.changed(ParamId::EarlyDiffusionSeed) {
                diffuser.set_seed(seed as u64);
            }

            let late = &mut channel.late;
            if let Some(lines) = bank.changed(ParamId::LateDelayLines) {
                late.set_delay_lines(lines as usize);
            }
            if let Some(ms) = bank.changed(ParamId::LateDelay) {
                late.set_delay(samples(ms));
            }
            if let Some(ms) = bank.changed(ParamId::LateDelayModDepth) {
                late.set_mod_depth(samples(ms));
            }
            if let Some(hz) = bank.changed(ParamId::LateDelayModRate) {
                late.set_mod_rate(rate(hz));
            }
            if let Some(feedback) = bank.changed(ParamId::LateDelayLineFeedback) {
                late.set_feedback(f64::from(feedback));
            }
            if let Some(seed) = bank.changed(ParamId::DelaySeed) {
                late.set_delay_seed(seed as u64);
            }
            if let Some(ms) = bank.changed(ParamId::LateDiffusionDelay) {
                late.set_diffusion_delay(samples(ms));
            }
            if let Some(ms) = bank.changed(ParamId::LateDiffusionModDepth) {
                late.set_diffusion_mod_depth(samples(ms));
            }
            if let Some(hz) = bank.changed(ParamId::LateDiffusionModRate) {
                late.set_diffusion_mod_rate(rate(hz));
            }
            if let Some(db) = bank.changed(ParamId::LateDiffusionDrive) {
                late.set_diffusion_drive(drive_gain(db));
            }
            if let Some(seed) = bank.changed(ParamId::LateDiffusionSeed) {
                late.set_diffusion_seed(seed as u64);
            }
            if let Some(hz) = bank.changed(ParamId::LateLowShelfCutoff) {
                late.set_low_shelf_cutoff(hz);
            }
            if let Some(db) = bank.changed(ParamId::LateLowShelfGain) {
                late.set_low_shelf_gain(db);
            }
            if let Some(hz) = bank.changed(ParamId::LateHighShelfCutoff) {
                late.set_high_shelf_cutoff(hz);
            }
            if let Some(db) = bank.changed(ParamId::LateHighShelfGain) {
                late.set_high_shelf_gain(db);
            }
            if let Some(hz) = bank.changed(ParamId::LateHighCutCutoff) {
                late.set_high_cut(hz);
            }
        }

        #[cfg(feature = "tracing")]
        {
            if let Some(lines) = bank.changed(ParamId::LateDelayLines) {
                tracing::debug!("reverb_late: {lines} delay lines");
            }
            if let Some(order) = bank.changed(ParamId::LateOrder) {
                tracing::debug!("reverb_late: order {:?}", LateOrder::from_index(order as usize));
            }
            if let Some(stages) = bank.changed(ParamId::EarlyDiffusionStages) {
                tracing::debug!("reverb_early: {stages} diffusion stages");
            }
            if let Some(stages) = bank.changed(ParamId::LateDiffusionStages) {
                tracing::debug!("reverb_late: {stages} diffusion stages");
            }
        }
    }
}
