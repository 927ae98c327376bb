//! Fourfold Core - DSP primitives and unit traits
//!
//! This crate provides the building blocks shared by the fourfold oscillator
//! and effect units, designed for real-time processing inside a host's
//! fixed-size audio callback: no allocation, no blocking, bounded cost per
//! frame.
//!
//! # Core Abstractions
//!
//! ## Units
//!
//! - [`Unit`] - Lifecycle shared by every unit (`init`, sample rate)
//! - [`OscillatorUnit`] - Note-driven mono source producing q31 samples
//! - [`InsertEffect`] - In-place interleaved stereo effect
//! - [`ModulationEffect`] - Main + sub bus stereo effect
//! - [`ParameterInfo`] - Plain-value parameter introspection
//!
//! ## Oscillators and Modulation
//!
//! - [`Phase`] - Wrapped phase accumulator in turns
//! - [`Lfo`] - Low-frequency oscillator with pure phase-offset taps
//! - [`bl_saw`] - PolyBLEP band-limited sawtooth
//!
//! ## Filters and Delay
//!
//! - [`AllpassChain`] - First-order all-pass cascade with a shared coefficient
//! - [`Biquad`] - RBJ cookbook low-pass
//! - [`StereoDelayLine`] - Fixed-capacity stereo ring with fractional reads
//!
//! ## Host Formats
//!
//! - [`q31_to_f32`] / [`f32_to_q31`] - Fixed-point sample conversion
//! - [`param_val_to_f32`] - 10-bit knob conversion
//! - [`NoteParams`] / [`note_to_increment`] - Pitch to phase increment
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! fourfold-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug!` events from non-audio paths
//! such as `init`.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod allpass;
pub mod biquad;
pub mod blep;
pub mod delay;
pub mod fast_math;
pub mod lfo;
pub mod math;
pub mod param_info;
pub mod phase;
pub mod pitch;
pub mod sample_format;
pub mod unit;

pub use allpass::AllpassChain;
pub use biquad::{Biquad, BiquadCoefficients};
pub use blep::{bl_saw, poly_blep};
pub use delay::{StereoDelayLine, StereoFrame};
pub use lfo::{Lfo, LfoWaveform, TRI_PHASE_OFFSETS};
pub use math::{flush_denormal, lerp, sin_turns};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use phase::Phase;
pub use pitch::{NoteParams, note_to_hz, note_to_increment};
pub use sample_format::{
    PARAM_VALUE_MAX, f32_to_param_val, f32_to_q31, param_val_to_f32, q31_to_f32,
};
pub use unit::{
    EffectParam, InsertEffect, ModulationEffect, OscParam, OscillatorUnit, Unit, knob_to_raw,
    selector_from_raw, selector_to_raw,
};

/// Sample rate the host runs at.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
