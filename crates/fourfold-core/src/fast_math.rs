//! Fast approximations for per-sample coefficient updates.
//!
//! Filters whose corner frequency moves every sample cannot afford a full
//! `tanf` call per channel. The approximation here is accurate to well under
//! 1% below 8 kHz at 48 kHz, the top of every swept range in this workspace.

/// Padé [3/2] approximation of `tan(x)`: `x(15 − x²) / (15 − 6x²)`.
///
/// # Accuracy
///
/// | Cutoff at 48 kHz | x = π·fc/fs | Relative error |
/// |------------------|-------------|----------------|
/// | < 4.6 kHz | < 0.3 | < 0.03% |
/// | < 7.6 kHz | < 0.5 | < 0.2% |
/// | < 15.3 kHz | < 1.0 | < 2% |
///
/// # Arguments
///
/// * `x` - Angle in radians. Valid for x ∈ \[0, π/3\].
///   Beyond this range, error grows as tan approaches its pole at π/2.
///
/// # Examples
///
/// ```
/// use fourfold_core::fast_math::fast_tan;
///
/// let x = core::f32::consts::PI * 1000.0 / 48000.0;
/// let exact = libm::tanf(x);
/// assert!((fast_tan(x) - exact).abs() / exact < 0.001);
/// ```
#[inline]
pub fn fast_tan(x: f32) -> f32 {
    let x2 = x * x;
    x * (15.0 - x2) / (15.0 - 6.0 * x2)
}
