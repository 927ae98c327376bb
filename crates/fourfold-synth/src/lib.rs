//! Fourfold Synth - oscillator units
//!
//! Two note-driven mono sources built on the primitives in `fourfold-core`.
//! Both implement [`OscillatorUnit`](fourfold_core::OscillatorUnit): the host
//! hands them a packed pitch and a live shape modulation value per block and
//! receives q31 samples.
//!
//! - [`FmStack`] - four sine operators in two FM stacks, crossfaded
//! - [`UnisonSaw`] - up to seven detuned PolyBLEP saws plus a sub octave
//!
//! ```rust
//! use fourfold_core::{NoteParams, OscParam, OscillatorUnit};
//! use fourfold_synth::FmStack;
//!
//! let mut fm = FmStack::new(48000.0);
//! fm.param_update(OscParam::Shape.raw(), 512);      // op1 ratio ≈ 8.1
//! fm.param_update(OscParam::ShiftShape.raw(), 200); // some FM
//!
//! let params = NoteParams::from_note(69);
//! fm.note_on(&params);
//!
//! let mut block = [0i32; 64];
//! fm.process_block(&params, &mut block);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod fm;
pub mod unison;

pub use fm::FmStack;
pub use unison::{MAX_VOICES, UnisonSaw, detune_index};
