//! Note and pitch input for oscillator units.
//!
//! The host packs the requested pitch into 16 bits: the high byte is a MIDI
//! note number and the low byte a fine offset in 1/256 semitone steps. Units
//! convert it to a per-sample phase increment once at the start of each block.

use libm::exp2f;

/// Reference pitch of MIDI note 69 (A4).
pub const A4_HZ: f32 = 440.0;

/// Highest note the converter accepts; higher notes are clamped.
pub const MAX_NOTE: u8 = 151;

/// Per-block note input handed to oscillator units by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteParams {
    /// High byte: note number, low byte: fine pitch in 1/256 semitone.
    pub pitch: u16,
    /// Live shape modulation, q31.
    pub shape_lfo: i32,
}

impl NoteParams {
    /// Params for `note` with no fine offset and no shape modulation.
    pub const fn from_note(note: u8) -> Self {
        Self {
            pitch: (note as u16) << 8,
            shape_lfo: 0,
        }
    }

    /// Note number.
    #[inline]
    pub const fn note(self) -> u8 {
        (self.pitch >> 8) as u8
    }

    /// Fine pitch in 1/256 semitone.
    #[inline]
    pub const fn fine(self) -> u8 {
        (self.pitch & 0xff) as u8
    }

    /// Live shape modulation mapped to `[-1, 1)`.
    #[inline]
    pub fn shape_mod(self) -> f32 {
        crate::q31_to_f32(self.shape_lfo)
    }

    /// Per-sample phase increment for this pitch.
    #[inline]
    pub fn increment(self, sample_rate: f32) -> f32 {
        note_to_increment(self.note(), self.fine(), sample_rate)
    }
}

/// Frequency in Hz of `note` plus `fine`/256 semitone.
///
/// # Example
/// ```rust
/// use fourfold_core::note_to_hz;
///
/// assert!((note_to_hz(69, 0) - 440.0).abs() < 1e-3);
/// assert!((note_to_hz(57, 0) - 220.0).abs() < 1e-3);
/// ```
#[inline]
pub fn note_to_hz(note: u8, fine: u8) -> f32 {
    let semitones = f32::from(note.min(MAX_NOTE)) - 69.0 + f32::from(fine) / 256.0;
    A4_HZ * exp2f(semitones / 12.0)
}

/// Per-sample phase increment (turns) of `note` plus `fine`/256 semitone.
#[inline]
pub fn note_to_increment(note: u8, fine: u8, sample_rate: f32) -> f32 {
    note_to_hz(note, fine) / sample_rate
}
