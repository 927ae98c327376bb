//! Fourfold Effects - stereo effect units
//!
//! Two block-processing effects built on the primitives in `fourfold-core`:
//!
//! - [`QuadraturePhaser`] - an [`InsertEffect`](fourfold_core::InsertEffect)
//!   that rewrites an interleaved stereo buffer in place
//! - [`TriPhaseChorus`] - a [`ModulationEffect`](fourfold_core::ModulationEffect)
//!   with separate main and sub buses
//!
//! Both take raw q31 parameter values from the host, or plain values through
//! [`ParameterInfo`](fourfold_core::ParameterInfo).
//!
//! ```rust
//! use fourfold_core::{EffectParam, InsertEffect, ParameterInfo};
//! use fourfold_effects::QuadraturePhaser;
//!
//! let mut phaser = QuadraturePhaser::new(48000.0);
//! let feedback = phaser.param_index_by_string_id("phaser_feedback").unwrap();
//! phaser.set_param(feedback, 0.5);
//!
//! let mut frames = [0.0_f32; 128];
//! phaser.process_block(&mut frames);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chorus;
pub mod phaser;

pub use chorus::TriPhaseChorus;
pub use phaser::QuadraturePhaser;
