//! Aether Core - DSP primitives for the Aether algorithmic reverb
//!
//! This crate provides the building blocks the reverb engine is assembled
//! from, designed for real-time audio processing with zero allocation in the
//! audio path. Every buffer is sized once, at construction, from the longest
//! delay its owner can ever request at the configured sample rate.
//!
//! # Core Abstractions
//!
//! ## Sample Precision
//!
//! - [`Sample`] - `f32` / `f64` abstraction; the early path runs single
//!   precision, the late feedback network double precision
//!
//! ## Delay Lines
//!
//! - [`RingBuffer`] - Fixed-capacity circular store with integer and
//!   interpolated taps
//! - [`Delay`] - Variable integer-length delay
//! - [`ModulatedAllpass`] - Lattice allpass with swept length
//!
//! ## Filters
//!
//! - [`Lowpass6dB`] / [`Highpass6dB`] - First-order cut filters
//! - [`Biquad`] - Second-order IIR with RBJ shelving coefficients
//!
//! ## Modulation & Randomness
//!
//! - [`Lfo`] - Sine oscillator, rate in cycles per sample
//! - [`Sweep`] - One-sided, slope-limited delay modulation for feedback loops
//! - [`Xorshift64s`] - Seedable xorshift64* generator
//! - [`SeedTable`] / [`blend`] - Two-stream seed domains with crossmix weighting
//!
//! ## Parameters
//!
//! - [`SmoothedParam`] - Exponential smoothing with change reporting
//! - [`ParamDescriptor`] - Range, default, smoothing time, and kind
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`wet_dry_mix`], [`ms_to_samples`], [`hz_to_rate`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature in
//! your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! aether-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use aether_core::{Delay, Lowpass6dB, SmoothedParam};
//!
//! let mut delay = Delay::<f32>::new(48000.0, 400.0);
//! let mut tone = Lowpass6dB::<f32>::new(48000.0, 8000.0);
//! let mut time = SmoothedParam::with_config(20.0, 48000.0, 500.0);
//! time.set_target(40.0);
//!
//! for i in 0..256 {
//!     time.advance();
//!     let length = aether_core::ms_to_samples(time.get(), 48000.0) as usize;
//!     let x = if i == 0 { 1.0 } else { 0.0 };
//!     let y = tone.process(delay.push(x, length));
//!     assert!(y.is_finite());
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Clamp, never fail**: Out-of-range lengths and cutoffs are clamped on
//!   the audio path; only construction can panic

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod delay;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;
pub mod ring_buffer;
pub mod rng;
pub mod sample;

// Re-export main types at crate root
pub use allpass::ModulatedAllpass;
pub use biquad::{Biquad, Coefficients, high_shelf_coefficients, low_shelf_coefficients};
pub use delay::Delay;
pub use lfo::{Lfo, MAX_SWEEP_SLOPE, Sweep};
pub use math::{db_to_linear, hz_to_rate, ms_to_samples, wet_dry_mix};
pub use one_pole::{Highpass6dB, Lowpass6dB};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamKind, ParamUnit};
pub use ring_buffer::RingBuffer;
pub use rng::{SeedTable, Xorshift64s, blend};
pub use sample::Sample;
