//! Host-facing unit traits.
//!
//! Every unit is an owned state struct with the same lifecycle: `init` resets
//! it, a `process_block` call consumes one block of frames, and
//! `param_update` applies one raw host value. Oscillators also receive note
//! events. The host serializes all calls, which `&mut self` enforces.
//!
//! Three block shapes exist:
//!
//! | Trait | Block signature | Units |
//! |-------|-----------------|-------|
//! | [`OscillatorUnit`] | note params in, q31 mono out | FM stack, unison saw |
//! | [`InsertEffect`] | interleaved stereo `f32`, in place | phaser |
//! | [`ModulationEffect`] | main + sub stereo buses, in → out | chorus |
//!
//! None of the entry points allocate, block, or fail. Unknown parameter
//! indices are ignored.

use crate::param_info::ParameterInfo;
use crate::pitch::NoteParams;

/// Lifecycle shared by every unit.
pub trait Unit: ParameterInfo {
    /// Resets all persistent state to its power-on values.
    ///
    /// `platform` and `api` identify the host; the units here accept any
    /// value. Calling `init` twice leaves the unit in the same state as
    /// calling it once.
    fn init(&mut self, platform: u32, api: u32);

    /// Sample rate the unit was built for.
    fn sample_rate(&self) -> f32;
}

/// A mono sound source driven by note events.
pub trait OscillatorUnit: Unit {
    /// Renders `out.len()` q31 samples.
    fn process_block(&mut self, params: &NoteParams, out: &mut [i32]);

    /// Note start.
    fn note_on(&mut self, params: &NoteParams);

    /// Note end.
    fn note_off(&mut self, params: &NoteParams);

    /// Applies a raw host parameter. See [`OscParam`] for the index layout.
    fn param_update(&mut self, index: u16, value: u16);
}

/// An effect that rewrites an interleaved stereo buffer in place.
pub trait InsertEffect: Unit {
    /// Processes `frames.len() / 2` stereo frames (`L, R, L, R, ...`).
    fn process_block(&mut self, frames: &mut [f32]);

    /// Applies a raw q31 parameter. See [`EffectParam`] for the index layout.
    fn param_update(&mut self, index: u8, value: i32);
}

/// An effect with separate main and sub stereo buses.
///
/// All four buffers are interleaved stereo of the same length.
pub trait ModulationEffect: Unit {
    /// Processes `main_in.len() / 2` stereo frames on both buses.
    fn process_block(
        &mut self,
        main_in: &[f32],
        main_out: &mut [f32],
        sub_in: &[f32],
        sub_out: &mut [f32],
    );

    /// Applies a raw q31 parameter. See [`EffectParam`] for the index layout.
    fn param_update(&mut self, index: u8, value: i32);
}

/// Oscillator parameter indices as sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum OscParam {
    /// User parameter 1
    Id1 = 0,
    /// User parameter 2
    Id2 = 1,
    /// User parameter 3
    Id3 = 2,
    /// User parameter 4
    Id4 = 3,
    /// User parameter 5
    Id5 = 4,
    /// User parameter 6
    Id6 = 5,
    /// Shape knob (10-bit)
    Shape = 6,
    /// Shifted shape knob (10-bit)
    ShiftShape = 7,
}

impl OscParam {
    /// Maps a raw index, `None` for unknown indices.
    pub const fn from_raw(index: u16) -> Option<Self> {
        Some(match index {
            0 => Self::Id1,
            1 => Self::Id2,
            2 => Self::Id3,
            3 => Self::Id4,
            4 => Self::Id5,
            5 => Self::Id6,
            6 => Self::Shape,
            7 => Self::ShiftShape,
            _ => return None,
        })
    }

    /// Raw host index.
    pub const fn raw(self) -> u16 {
        self as u16
    }
}

/// Effect parameter indices as sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectParam {
    /// Time knob
    Time = 0,
    /// Depth knob
    Depth = 1,
    /// Shifted depth knob
    ShiftDepth = 2,
}

impl EffectParam {
    /// Maps a raw index, `None` for unknown indices.
    pub const fn from_raw(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Time),
            1 => Some(Self::Depth),
            2 => Some(Self::ShiftDepth),
            _ => None,
        }
    }

    /// Raw host index.
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Oscillator user parameters carry small signed integers in a `u16`.
#[inline]
pub const fn selector_from_raw(value: u16) -> i16 {
    value as i16
}

/// Inverse of [`selector_from_raw`] for a plain selector value.
#[inline]
pub fn selector_to_raw(value: f32) -> u16 {
    (libm::roundf(value) as i16) as u16
}

/// Rounds a plain knob position to the raw 10-bit value.
#[inline]
pub fn knob_to_raw(value: f32) -> u16 {
    libm::roundf(value.clamp(0.0, f32::from(crate::PARAM_VALUE_MAX))) as u16
}
