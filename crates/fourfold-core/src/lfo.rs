//! Low Frequency Oscillator with pure phase-offset sampling.
//!
//! Stereo and multi-tap modulation reads one LFO at several phase points per
//! frame. [`Lfo::sample_at`] evaluates the waveform at `phase + offset` without
//! touching the stored phase, and [`Lfo::tick`] advances the state exactly once
//! per frame:
//!
//! ```rust
//! use fourfold_core::{Lfo, LfoWaveform};
//!
//! let mut lfo = Lfo::new(48000.0, 0.5);
//! lfo.set_waveform(LfoWaveform::Triangle);
//!
//! lfo.tick();
//! let left = lfo.sample_unipolar_at(0.0);
//! let right = lfo.sample_unipolar_at(0.25);
//! # assert!((0.0..=1.0).contains(&left) && (0.0..=1.0).contains(&right));
//! ```

use crate::math::sin_turns;
use crate::phase::{Phase, wrap};

/// Phase offsets of three taps spaced 120° apart.
pub const TRI_PHASE_OFFSETS: [f32; 3] = [0.0, 1.0 / 3.0, 2.0 / 3.0];

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// `sin(2π·phase)`
    #[default]
    Sine,
    /// Linear ramp from -1 at phase 0 up to +1 at phase 0.5 and back.
    Triangle,
}

impl LfoWaveform {
    /// Bipolar waveform value in `[-1, 1]` at `turns` (already wrapped).
    #[inline]
    fn eval(self, turns: f32) -> f32 {
        match self {
            LfoWaveform::Sine => sin_turns(turns),
            LfoWaveform::Triangle => {
                if turns < 0.5 {
                    4.0 * turns - 1.0
                } else {
                    3.0 - 4.0 * turns
                }
            }
        }
    }
}

/// Low Frequency Oscillator for generating modulation signals.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: Phase,
    /// Phase increment per sample
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create new LFO with given sample rate and frequency
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: Phase::new(),
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set frequency in Hz
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Get current frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Set waveform
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Reset phase to 0
    pub fn reset(&mut self) {
        self.phase.reset();
    }

    /// Moves the phase to `turns` (wrapped into `[0, 1)`).
    pub fn set_phase(&mut self, turns: f32) {
        self.phase = Phase::at(turns);
    }

    /// Get current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase.value()
    }

    /// Advances the phase by one sample.
    #[inline]
    pub fn tick(&mut self) {
        self.phase.advance(self.phase_inc);
    }

    /// Bipolar value in `[-1, 1]` at `phase + offset`. Does not mutate state.
    #[inline]
    pub fn sample_at(&self, offset: f32) -> f32 {
        self.waveform.eval(wrap(self.phase.value() + offset))
    }

    /// Unipolar value in `[0, 1]` at `phase + offset`. Does not mutate state.
    #[inline]
    pub fn sample_unipolar_at(&self, offset: f32) -> f32 {
        (self.sample_at(offset) + 1.0) * 0.5
    }

    /// Samples `N` taps at the given offsets from the current phase.
    #[inline]
    pub fn sample_taps<const N: usize>(&self, offsets: [f32; N]) -> [f32; N] {
        offsets.map(|offset| self.sample_at(offset))
    }
}
