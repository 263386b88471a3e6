//! Unit conversions and the output crossfade.
//!
//! - [`db_to_linear`] - decibels to gain
//! - [`ms_to_samples`] - time to (fractional) delay length
//! - [`hz_to_rate`] - frequency to cycles per sample
//! - [`wet_dry_mix`] - dry/wet crossfade

use libm::expf;

/// Decibels to linear gain: 0 dB is 1.0, -6 dB about 0.5.
///
/// ```rust
/// use aether_core::db_to_linear;
///
/// assert_eq!(db_to_linear(0.0), 1.0);
/// assert!((db_to_linear(-24.0) - 0.0631).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const LN10_OVER_20: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * LN10_OVER_20)
}

/// Convert milliseconds to a fractional sample count.
///
/// Returned at double precision since most delay lengths feed `f64` taps.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f64 {
    f64::from(ms) / 1000.0 * f64::from(sample_rate)
}

/// Convert a frequency in Hz to cycles per sample, the unit [`Lfo`](crate::Lfo) runs in.
#[inline]
pub fn hz_to_rate(freq_hz: f32, sample_rate: f32) -> f64 {
    f64::from(freq_hz) / f64::from(sample_rate)
}

/// `dry + (wet - dry) * mix`, with `mix` in `[0, 1]`.
///
/// At `mix = 0.0` the result is `dry` bit for bit whenever `wet` is finite,
/// and at `mix = 1.0` it is `wet` to within rounding.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
