//! Conversions between the host's fixed-point representations and `f32`.
//!
//! Hosts exchange oscillator output and effect parameters as q31 (signed
//! 32-bit fixed point, 31 fractional bits) and oscillator knobs as 10-bit
//! integers. Conversion happens only at the edges of a block call; all
//! internal math is `f32`.

/// Scale of a full-range q31 value.
const Q31_SCALE: f32 = 2_147_483_648.0;

/// Largest raw value of a 10-bit knob.
pub const PARAM_VALUE_MAX: u16 = 1023;

/// Converts a q31 sample or parameter to `f32` in `[-1, 1)`.
///
/// # Example
/// ```rust
/// use fourfold_core::q31_to_f32;
///
/// assert_eq!(q31_to_f32(0), 0.0);
/// assert_eq!(q31_to_f32(i32::MIN), -1.0);
/// assert_eq!(q31_to_f32(0x4000_0000), 0.5);
/// ```
#[inline]
pub fn q31_to_f32(value: i32) -> f32 {
    value as f32 / Q31_SCALE
}

/// Converts `f32` to q31, clipping to `[-1, 1]` first.
///
/// `NaN` maps to zero.
#[inline]
pub fn f32_to_q31(value: f32) -> i32 {
    let clipped = value.clamp(-1.0, 1.0);
    // `as` saturates, so +1.0 lands on i32::MAX.
    (clipped * Q31_SCALE) as i32
}

/// Maps a 10-bit knob value (`0..=1023`) to `[0, 1]`.
///
/// Values above 1023 are clamped.
#[inline]
pub fn param_val_to_f32(value: u16) -> f32 {
    f32::from(value.min(PARAM_VALUE_MAX)) / f32::from(PARAM_VALUE_MAX)
}

/// Inverse of [`param_val_to_f32`], rounding to the nearest step.
#[inline]
pub fn f32_to_param_val(value: f32) -> u16 {
    libm::roundf(value.clamp(0.0, 1.0) * f32::from(PARAM_VALUE_MAX)) as u16
}
