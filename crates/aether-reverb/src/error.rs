//! Error types for engine setup.
//!
//! Nothing on the audio path returns an error: out-of-range values are
//! clamped there. These errors only come out of construction and of binding
//! parameter ports by name.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::string::String;
use thiserror::Error;

/// Errors that can occur while building or wiring up the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReverbError {
    /// Sample rate was zero, negative, or not finite.
    #[error("invalid sample rate: {0} (must be finite and > 0)")]
    InvalidSampleRate(f32),

    /// No parameter matches the given name.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}

impl ReverbError {
    /// Create an unknown parameter error.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        ReverbError::UnknownParameter(name.into())
    }
}

/// Validates a sample rate for engine construction.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, ReverbError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(ReverbError::InvalidSampleRate(sample_rate))
    }
}
