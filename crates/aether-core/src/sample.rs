//! Sample precision abstraction.
//!
//! The early reflection path runs at single precision while the late network
//! runs its feedback loops at double precision to keep rounding error from
//! accumulating over long tails. Every primitive that sits on either path is
//! generic over [`Sample`].

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Floating-point sample type (`f32` or `f64`).
pub trait Sample:
    Copy
    + Default
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// Converts from `f32`.
    fn from_f32(x: f32) -> Self;
    /// Converts from `f64`.
    fn from_f64(x: f64) -> Self;
    /// Converts to `f32`.
    fn to_f32(self) -> f32;
    /// Converts to `f64`.
    fn to_f64(self) -> f64;
    /// Hyperbolic tangent.
    fn tanh(self) -> Self;
    /// Absolute value.
    fn abs(self) -> Self;

    /// Flushes values below the denormal threshold to exactly zero.
    #[inline]
    fn flush_denormal(self) -> Self {
        if self.abs().to_f64() < 1e-20 {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Sample for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f32(x: f32) -> Self {
        x
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        x as f32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn tanh(self) -> Self {
        libm::tanhf(self)
    }

    #[inline]
    fn abs(self) -> Self {
        libm::fabsf(self)
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn from_f32(x: f32) -> Self {
        x as f64
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn tanh(self) -> Self {
        libm::tanh(self)
    }

    #[inline]
    fn abs(self) -> Self {
        libm::fabs(self)
    }
}
