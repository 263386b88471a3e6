//! Second-order sections and shelving designs.
//!
//! Provides a generic second-order IIR filter plus the shelving coefficient
//! sets used by the late-reverb damping cascade.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas and is
//! always carried out in `f64`, whatever the sample type of the filter.

use crate::Sample;
use crate::one_pole::clamp_cutoff;
use core::f64::consts::PI;
use libm::{cos, sin, sqrt};

/// Raw RBJ coefficients `(b0, b1, b2, a0, a1, a2)`, not yet normalized.
pub type Coefficients = (f64, f64, f64, f64, f64, f64);

/// Direct-form-I second-order section:
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad<T: Sample> {
    // Numerator
    b0: T,
    b1: T,
    b2: T,

    // Denominator, divided through by a0
    a1: T,
    a2: T,

    // Previous inputs
    x1: T,
    x2: T,

    // Previous outputs
    y1: T,
    y2: T,
}

impl<T: Sample> Biquad<T> {
    /// Identity section (`b0 = 1`, everything else 0) with empty memory.
    pub fn new() -> Self {
        Self {
            b0: T::ONE,
            b1: T::ZERO,
            b2: T::ZERO,
            a1: T::ZERO,
            a2: T::ZERO,
            x1: T::ZERO,
            x2: T::ZERO,
            y1: T::ZERO,
            y2: T::ZERO,
        }
    }

    /// Sets the biquad coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coefficients;
        let a0_inv = 1.0 / a0;
        self.b0 = T::from_f64(b0 * a0_inv);
        self.b1 = T::from_f64(b1 * a0_inv);
        self.b2 = T::from_f64(b2 * a0_inv);
        self.a1 = T::from_f64(a1 * a0_inv);
        self.a2 = T::from_f64(a2 * a0_inv);
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: T) -> T {
        let output = (self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2)
            .flush_denormal();

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter state without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = T::ZERO;
        self.x2 = T::ZERO;
        self.y1 = T::ZERO;
        self.y2 = T::ZERO;
    }
}

impl<T: Sample> Default for Biquad<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared shelf intermediates: `(A, cos ω, 2·sqrt(A)·α)` with slope S = 1.
fn shelf_terms(frequency: f32, gain: f64, sample_rate: f32) -> (f64, f64, f64) {
    let frequency = f64::from(clamp_cutoff(frequency, sample_rate));
    let a = sqrt(gain.max(1e-6));
    let omega = 2.0 * PI * frequency / f64::from(sample_rate);
    // S = 1: alpha = sin(ω)/2 * sqrt(2)
    let alpha = sin(omega) / 2.0 * core::f64::consts::SQRT_2;
    (a, cos(omega), 2.0 * sqrt(a) * alpha)
}

/// Calculates low-shelf coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Shelf midpoint in Hz
/// * `gain` - Linear gain below the shelf (1.0 = flat)
/// * `sample_rate` - Sample rate in Hz
pub fn low_shelf_coefficients(frequency: f32, gain: f64, sample_rate: f32) -> Coefficients {
    let (a, cos_omega, beta) = shelf_terms(frequency, gain, sample_rate);

    let b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + beta);
    let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - beta);
    let a0 = (a + 1.0) + (a - 1.0) * cos_omega + beta;
    let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) + (a - 1.0) * cos_omega - beta;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-shelf coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Shelf midpoint in Hz
/// * `gain` - Linear gain above the shelf (1.0 = flat)
/// * `sample_rate` - Sample rate in Hz
pub fn high_shelf_coefficients(frequency: f32, gain: f64, sample_rate: f32) -> Coefficients {
    let (a, cos_omega, beta) = shelf_terms(frequency, gain, sample_rate);

    let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + beta);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - beta);
    let a0 = (a + 1.0) - (a - 1.0) * cos_omega + beta;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) - (a - 1.0) * cos_omega - beta;

    (b0, b1, b2, a0, a1, a2)
}
