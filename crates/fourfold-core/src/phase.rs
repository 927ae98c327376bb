//! Phase accumulator shared by every oscillator and LFO in the workspace.
//!
//! A phase is a position within one waveform cycle, stored in turns
//! (`0.0` = start of cycle, `1.0` = one full cycle). Each sample the phase is
//! advanced by a per-sample increment (`frequency / sample_rate`) and wrapped
//! back into `[0, 1)` by subtracting its floor.
//!
//! Wrapping with `floor` instead of a single `-= 1.0` keeps the phase in range
//! for increments larger than one cycle and for negative increments.

use libm::floorf;

/// Running phase in turns, always in `[0, 1)` after [`advance`](Phase::advance).
///
/// # Example
///
/// ```rust
/// use fourfold_core::Phase;
///
/// let mut phase = Phase::new();
/// phase.advance(0.75);
/// phase.advance(0.5);
/// assert!((phase.value() - 0.25).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phase {
    value: f32,
}

impl Phase {
    /// Creates a phase at the start of the cycle.
    pub const fn new() -> Self {
        Self { value: 0.0 }
    }

    /// Creates a phase at `turns`, wrapped into `[0, 1)`.
    pub fn at(turns: f32) -> Self {
        Self {
            value: wrap(turns),
        }
    }

    /// Current position in turns.
    #[inline]
    pub fn value(self) -> f32 {
        self.value
    }

    /// Advances by `increment` turns and wraps.
    #[inline]
    pub fn advance(&mut self, increment: f32) {
        self.value = wrap(self.value + increment);
    }

    /// Returns to the start of the cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Wraps `turns` into `[0, 1)`.
///
/// Rounding can push `x - floor(x)` up to exactly `1.0` for tiny negative
/// inputs, so that case folds back to zero.
#[inline]
pub fn wrap(turns: f32) -> f32 {
    let wrapped = turns - floorf(turns);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
