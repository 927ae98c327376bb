//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.

use core::f32::consts::TAU;
use libm::sinf;

/// Sine of a phase given in turns: `sin(2π·turns)`.
///
/// # Example
/// ```rust
/// use fourfold_core::sin_turns;
///
/// assert!((sin_turns(0.25) - 1.0).abs() < 1e-6);
/// assert!(sin_turns(0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn sin_turns(turns: f32) -> f32 {
    sinf(TAU * turns)
}

/// Flush denormal (subnormal) floats to zero.
///
/// Values below `1e-20` are far beneath audibility and well above where the
/// IEEE 754 subnormal range begins. Use in feedback loops where the signal can
/// decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation: `a + (b - a) * t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
