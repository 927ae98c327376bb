//! Property-based tests for fourfold-core DSP primitives.
//!
//! Tests phase wraparound, LFO tap bounds, all-pass stability, and delay line
//! integrity using proptest for randomized input generation.

use fourfold_core::{
    AllpassChain, Biquad, BiquadCoefficients, Lfo, LfoWaveform, Phase, StereoDelayLine,
    f32_to_q31, q31_to_f32,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any sequence of non-negative increments keeps the phase in [0, 1).
    #[test]
    fn phase_stays_in_unit_interval(
        start in 0.0f32..1.0f32,
        increments in prop::collection::vec(0.0f32..4.0f32, 1..256),
    ) {
        let mut phase = Phase::at(start);
        for inc in increments {
            phase.advance(inc);
            let v = phase.value();
            prop_assert!((0.0..1.0).contains(&v), "phase {} after increment {}", v, inc);
        }
    }

    /// Negative increments also wrap into [0, 1).
    #[test]
    fn phase_wraps_negative_increments(
        increments in prop::collection::vec(-0.5f32..0.5f32, 1..256),
    ) {
        let mut phase = Phase::new();
        for inc in increments {
            phase.advance(inc);
            prop_assert!((0.0..1.0).contains(&phase.value()));
        }
    }

    /// Advancing by d for round(1/d) steps returns close to the start.
    #[test]
    fn phase_full_cycle_returns(
        start in 0.0f32..1.0f32,
        steps in 2u32..2000u32,
    ) {
        let d = 1.0 / steps as f32;
        let mut phase = Phase::at(start);
        for _ in 0..steps {
            phase.advance(d);
        }
        let diff = (phase.value() - start).abs();
        let err = diff.min(1.0 - diff);
        prop_assert!(err < 1e-3, "start {} end {} after {} steps", start, phase.value(), steps);
    }

    /// Tap sampling at arbitrary offsets stays in range and never moves the phase.
    #[test]
    fn lfo_taps_bounded_and_pure(
        freq in 0.01f32..20.0f32,
        ticks in 0usize..5000,
        offset in -2.0f32..2.0f32,
        triangle in any::<bool>(),
    ) {
        let mut lfo = Lfo::new(48000.0, freq);
        if triangle {
            lfo.set_waveform(LfoWaveform::Triangle);
        }
        for _ in 0..ticks {
            lfo.tick();
        }
        let phase = lfo.phase();
        let bi = lfo.sample_at(offset);
        let uni = lfo.sample_unipolar_at(offset);
        prop_assert!((-1.0..=1.0).contains(&bi));
        prop_assert!((0.0..=1.0).contains(&uni));
        prop_assert_eq!(lfo.phase(), phase);
    }

    /// All-pass chains stay bounded for any corner in the swept range.
    #[test]
    fn allpass_chain_stability(
        freq in 20.0f32..19000.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut chain: AllpassChain<4> = AllpassChain::new();
        chain.set_frequency(freq, 48000.0);
        for _ in 0..32 {
            for &sample in &input {
                let out = chain.process(sample);
                prop_assert!(out.is_finite() && out.abs() < 32.0, "freq={} out={}", freq, out);
            }
        }
    }

    /// Low-pass biquads produce finite output for random input.
    #[test]
    fn biquad_lowpass_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.1f32..10.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new(BiquadCoefficients::lowpass(freq, q, 48000.0));
        for &sample in &input {
            prop_assert!(biquad.process(sample).is_finite());
        }
    }

    /// Fractional reads fall between the two neighbouring frames.
    #[test]
    fn delay_frac_read_between_neighbours(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 64..200),
        offset in 0.0f32..62.0f32,
    ) {
        let mut delay: StereoDelayLine<64> = StereoDelayLine::new();
        for &s in &samples {
            delay.write((s, -s));
        }
        let lo = offset.floor() as usize;
        let (a, _) = delay.read(lo);
        let (b, _) = delay.read(lo + 1);
        let (l, r) = delay.read_frac(offset);
        prop_assert!(l >= a.min(b) - 1e-6 && l <= a.max(b) + 1e-6);
        prop_assert!((l + r).abs() < 1e-6);
    }

    /// q31 conversion round-trips within one LSB of f32 precision.
    #[test]
    fn q31_roundtrip(x in -1.0f32..1.0f32) {
        let back = q31_to_f32(f32_to_q31(x));
        prop_assert!((back - x).abs() < 1e-6);
    }
}
