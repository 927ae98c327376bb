//! Cascade of first-order all-pass stages sharing one coefficient.
//!
//! Each stage is `H(z) = (a + z⁻¹) / (1 + a·z⁻¹)`: unity magnitude, with a
//! phase shift that sweeps from 0 to -180° around the corner frequency.
//! Cascading `STAGES` of them at the same corner gives `STAGES / 2` notches
//! when the output is summed with the dry signal.
//!
//! The chain stores the coefficient once and a `[x1, y1]` pair per stage, so
//! every stage always sees the same corner frequency.

use core::f32::consts::PI;

use crate::fast_math::fast_tan;

/// History of one first-order stage.
#[derive(Debug, Clone, Copy, Default)]
struct StageState {
    /// Previous input sample
    x1: f32,
    /// Previous output sample
    y1: f32,
}

/// `STAGES` first-order all-pass stages in series.
///
/// # Example
///
/// ```rust
/// use fourfold_core::AllpassChain;
///
/// let mut chain: AllpassChain<4> = AllpassChain::new();
/// chain.set_frequency(1000.0, 48000.0);
/// let y = chain.process(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct AllpassChain<const STAGES: usize> {
    a: f32,
    stages: [StageState; STAGES],
}

impl<const STAGES: usize> Default for AllpassChain<STAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const STAGES: usize> AllpassChain<STAGES> {
    /// Creates a chain with coefficient 0 (a pure one-sample delay per stage).
    pub fn new() -> Self {
        Self {
            a: 0.0,
            stages: [StageState::default(); STAGES],
        }
    }

    /// Sets the shared coefficient directly.
    #[inline]
    pub fn set_coefficient(&mut self, a: f32) {
        self.a = a;
    }

    /// Current shared coefficient.
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.a
    }

    /// Sets the corner frequency of every stage.
    ///
    /// `freq` is clamped to `[10 Hz, 0.4·fs]`, inside the accurate range of
    /// [`fast_tan`].
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, sample_rate: f32) {
        self.a = coefficient_for(freq, sample_rate);
    }

    /// Runs one sample through every stage in order.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let a = self.a;
        self.stages.iter_mut().fold(input, |x, stage| {
            let y = a * x + stage.x1 - a * stage.y1;
            stage.x1 = x;
            stage.y1 = y;
            y
        })
    }

    /// Clears all stage history. The coefficient is kept.
    pub fn clear(&mut self) {
        self.stages = [StageState::default(); STAGES];
    }
}

/// All-pass coefficient `(t − 1) / (t + 1)` with `t = tan(π·fc/fs)`.
#[inline]
pub fn coefficient_for(freq: f32, sample_rate: f32) -> f32 {
    // max then min: the upper bound drops below 10 Hz at very low rates.
    let freq = freq.max(10.0).min(sample_rate * 0.4);
    let t = fast_tan(PI * freq / sample_rate);
    (t - 1.0) / (t + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_coefficient_is_pure_delay() {
        let mut chain: AllpassChain<4> = AllpassChain::new();
        let impulse: [f32; 8] = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let out: [f32; 8] = impulse.map(|x| chain.process(x));
        assert_eq!(out, [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_coefficient_range() {
        for fc in [20.0, 500.0, 2000.0, 8000.0] {
            let a = coefficient_for(fc, 48000.0);
            assert!(a > -1.0 && a < 1.0, "unstable coefficient {a} at {fc} Hz");
        }
        // fs/4: tan(π/4) = 1 → a = 0
        assert!(coefficient_for(12000.0, 48000.0).abs() < 0.01);
    }

    #[test]
    fn test_coefficient_at_tiny_sample_rate() {
        for fs in [1.0, 16.0, 24.0] {
            let a = coefficient_for(500.0, fs);
            assert!(a.is_finite() && a.abs() < 1.0, "fs={fs}: {a}");
        }
    }

    #[test]
    fn test_unity_magnitude() {
        // Energy of a long impulse response equals the input energy.
        let mut chain: AllpassChain<4> = AllpassChain::new();
        chain.set_frequency(1500.0, 48000.0);
        let mut energy = 0.0_f64;
        for n in 0..20_000 {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let y = chain.process(x);
            energy += f64::from(y * y);
        }
        assert!((energy - 1.0).abs() < 1e-3, "impulse energy {energy}");
    }

    #[test]
    fn test_clear_keeps_coefficient() {
        let mut chain: AllpassChain<2> = AllpassChain::new();
        chain.set_coefficient(0.3);
        chain.process(1.0);
        chain.clear();
        assert_eq!(chain.coefficient(), 0.3);
        // After clear, the first output only depends on the new input.
        assert!((chain.process(1.0) - 0.09).abs() < 1e-6);
    }
}
