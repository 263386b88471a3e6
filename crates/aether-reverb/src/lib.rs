//! Aether Reverb - Real-time stereo algorithmic reverb
//!
//! The engine is assembled from aether-core primitives into four stages:
//!
//! - [`Predelay`] - Stereo width matrix and per-channel predelay
//! - [`EarlyReflections`] - Cut filters, seeded [`MultitapDelay`], and an
//!   [`AllpassDiffuser`] at single precision
//! - [`LateReverb`] - Up to 12 modulated feedback delay lines with
//!   per-line diffusion and damping at double precision
//! - [`AetherReverb`] - Parameter smoothing, change dispatch, and the final
//!   dry/wet mix
//!
//! Parameters are described by the static [`PARAMS`] table and indexed by
//! [`ParamId`]. Hosts bind their storage through [`ParamPorts`], or use the
//! named [`ReverbParams`] struct which binds every field at once.
//!
//! ## Example
//!
//! ```rust
//! use aether_reverb::{AetherReverb, ReverbParams};
//!
//! let mut reverb = AetherReverb::new(48000.0);
//! let mut params = ReverbParams::default();
//! params.mix = 100.0;
//! params.late_level = 60.0;
//! params.late_delay_lines = 8.0;
//!
//! let mut input = vec![0.0f32; 4800];
//! input[0] = 1.0;
//! let mut left = vec![0.0f32; 4800];
//! let mut right = vec![0.0f32; 4800];
//!
//! reverb.prepare(&params.ports());
//! reverb.process(input.len(), &params.ports(), &input, &input, &mut left, &mut right);
//! assert!(left.iter().all(|x| x.is_finite()));
//! ```
//!
//! ## Features
//!
//! - `std` (default) - Enables `std` in aether-core and thiserror
//! - `tracing` - Emits `debug` events on construction, rebuild, and
//!   topology changes

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod control;
pub mod diffuser;
pub mod early;
pub mod engine;
pub mod error;
pub mod late;
pub mod multitap;
pub mod params;
pub mod predelay;

// Re-export main types at crate root
pub use control::ParamBank;
pub use diffuser::{AllpassDiffuser, DiffuserSettings, MAX_FEEDBACK, MAX_STAGES};
pub use early::{EarlyReflections, EarlySettings};
pub use engine::AetherReverb;
pub use error::ReverbError;
pub use late::{DampingSettings, LateOrder, LateReverb, LateSettings, MAX_LINES};
pub use multitap::{MAX_TAPS, MultitapDelay};
pub use params::{PARAM_COUNT, PARAMS, ParamId, ParamPorts, ReverbParams};
pub use predelay::{MAX_PREDELAY_MS, Predelay};
