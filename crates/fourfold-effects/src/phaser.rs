//! Stereo phaser with quadrature-swept all-pass chains.
//!
//! One triangle LFO drives both channels. The left chain reads it at the
//! current phase, the right chain at `phase + offset`, so the two notch
//! patterns sweep apart by a configurable fraction of a cycle. Each channel
//! runs four first-order all-pass stages sharing one coefficient, recomputed
//! every sample from
//!
//! ```text
//! fc = 500 + 7500·s²      s = unipolar triangle in [0, 1]
//! ```
//!
//! Squaring spends more of the sweep in the low range. The chain output is
//! fed back into its own input and then added to the dry signal; there is no
//! wet/dry control.
//!
//! # Parameters
//!
//! | Host index | Name | Plain range | Mapping |
//! |------------|------|-------------|---------|
//! | time | Rate | 0..=1 | `0.05 + 9.95·v` Hz |
//! | depth | Feedback | -1..=1 | `0.9·v` |
//! | shift-depth | Stereo Offset | 0..=1 | `0.5·v` cycles |

use fourfold_core::{
    AllpassChain, EffectParam, InsertEffect, Lfo, LfoWaveform, ParamDescriptor, ParamId,
    ParameterInfo, Unit, f32_to_q31, flush_denormal, q31_to_f32,
};

/// All-pass stages per channel.
pub const STAGES: usize = 4;

/// Corner frequency at the bottom of the sweep.
pub const BASE_FREQ: f32 = 500.0;

/// Sweep span above [`BASE_FREQ`].
pub const DEPTH_FREQ: f32 = 7500.0;

/// Slowest sweep rate.
pub const MIN_RATE_HZ: f32 = 0.05;

/// Rate span covered by the time knob.
pub const RATE_SPAN_HZ: f32 = 9.95;

/// Sweep rate after `init`.
pub const INIT_RATE_HZ: f32 = 0.1;

/// Feedback at full depth.
pub const MAX_FEEDBACK: f32 = 0.9;

/// Stereo offset at full shift-depth, in LFO cycles.
pub const MAX_STEREO_OFFSET: f32 = 0.5;

/// Stereo offset after `init`: a quarter cycle.
pub const INIT_STEREO_OFFSET: f32 = 0.25;

const INIT_PLAIN: [f32; 3] = [
    (INIT_RATE_HZ - MIN_RATE_HZ) / RATE_SPAN_HZ,
    0.0,
    INIT_STEREO_OFFSET / MAX_STEREO_OFFSET,
];

const HOST_ORDER: [EffectParam; 3] = [
    EffectParam::Time,
    EffectParam::Depth,
    EffectParam::ShiftDepth,
];

/// Corner frequency for a unipolar sweep control.
///
/// ```rust
/// use fourfold_effects::phaser::cutoff_for;
///
/// assert_eq!(cutoff_for(0.0), 500.0);
/// assert_eq!(cutoff_for(1.0), 8000.0);
/// assert_eq!(cutoff_for(0.5), 2375.0);
/// ```
#[inline]
pub fn cutoff_for(control: f32) -> f32 {
    BASE_FREQ + DEPTH_FREQ * control * control
}

/// Two-channel, four-stage phaser swept by one triangle LFO.
///
/// # Example
///
/// ```rust
/// use fourfold_core::{EffectParam, InsertEffect, f32_to_q31};
/// use fourfold_effects::QuadraturePhaser;
///
/// let mut phaser = QuadraturePhaser::new(48000.0);
/// phaser.param_update(EffectParam::Time.raw(), f32_to_q31(0.1));
/// phaser.param_update(EffectParam::Depth.raw(), f32_to_q31(0.6));
///
/// let mut frames = [0.25_f32; 256];
/// phaser.process_block(&mut frames);
/// ```
#[derive(Debug, Clone)]
pub struct QuadraturePhaser {
    sample_rate: f32,
    lfo: Lfo,
    left: AllpassChain<STAGES>,
    right: AllpassChain<STAGES>,
    feedback: f32,
    stereo_offset: f32,
    last_left: f32,
    last_right: f32,
    /// Last applied plain value, in `HOST_ORDER` order.
    plain: [f32; 3],
}

impl Default for QuadraturePhaser {
    fn default() -> Self {
        Self::new(fourfold_core::DEFAULT_SAMPLE_RATE)
    }
}

impl QuadraturePhaser {
    /// Creates an initialized phaser.
    pub fn new(sample_rate: f32) -> Self {
        let mut lfo = Lfo::new(sample_rate, INIT_RATE_HZ);
        lfo.set_waveform(LfoWaveform::Triangle);
        let mut phaser = Self {
            sample_rate,
            lfo,
            left: AllpassChain::new(),
            right: AllpassChain::new(),
            feedback: 0.0,
            stereo_offset: INIT_STEREO_OFFSET,
            last_left: 0.0,
            last_right: 0.0,
            plain: INIT_PLAIN,
        };
        phaser.init(0, 0);
        phaser
    }

    /// LFO rate in Hz.
    pub fn rate(&self) -> f32 {
        self.lfo.frequency()
    }

    /// Feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Right-channel phase lead in LFO cycles.
    pub fn stereo_offset(&self) -> f32 {
        self.stereo_offset
    }

    /// Current `(left, right)` sweep controls in `[0, 1]`.
    ///
    /// These are the values the most recent frame used.
    pub fn sweep_controls(&self) -> (f32, f32) {
        (
            self.lfo.sample_unipolar_at(0.0),
            self.lfo.sample_unipolar_at(self.stereo_offset),
        )
    }

    /// Current `(left, right)` all-pass coefficients.
    pub fn coefficients(&self) -> (f32, f32) {
        (self.left.coefficient(), self.right.coefficient())
    }
}

impl Unit for QuadraturePhaser {
    fn init(&mut self, platform: u32, api: u32) {
        self.lfo.set_frequency(INIT_RATE_HZ);
        self.lfo.reset();
        self.left.clear();
        self.right.clear();
        self.left.set_coefficient(0.0);
        self.right.set_coefficient(0.0);
        self.feedback = 0.0;
        self.stereo_offset = INIT_STEREO_OFFSET;
        self.last_left = 0.0;
        self.last_right = 0.0;
        self.plain = INIT_PLAIN;

        #[cfg(feature = "tracing")]
        tracing::debug!(platform, api, "quadrature phaser init");
        #[cfg(not(feature = "tracing"))]
        let _ = (platform, api);
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl InsertEffect for QuadraturePhaser {
    fn process_block(&mut self, frames: &mut [f32]) {
        let sr = self.sample_rate;
        let fb = self.feedback;

        for frame in frames.chunks_exact_mut(2) {
            self.lfo.tick();
            let (ctl_l, ctl_r) = self.sweep_controls();
            self.left.set_frequency(cutoff_for(ctl_l), sr);
            self.right.set_frequency(cutoff_for(ctl_r), sr);

            let wet_l = self.left.process(frame[0] + fb * self.last_left);
            let wet_r = self.right.process(frame[1] + fb * self.last_right);
            self.last_left = flush_denormal(wet_l);
            self.last_right = flush_denormal(wet_r);

            frame[0] += wet_l;
            frame[1] += wet_r;
        }
    }

    fn param_update(&mut self, index: u8, value: i32) {
        let v = q31_to_f32(value);
        let (slot, plain) = match EffectParam::from_raw(index) {
            Some(EffectParam::Time) => {
                let v = v.clamp(0.0, 1.0);
                self.lfo.set_frequency(MIN_RATE_HZ + RATE_SPAN_HZ * v);
                (0, v)
            }
            Some(EffectParam::Depth) => {
                self.feedback = MAX_FEEDBACK * v;
                (1, v)
            }
            Some(EffectParam::ShiftDepth) => {
                let v = v.clamp(0.0, 1.0);
                self.stereo_offset = MAX_STEREO_OFFSET * v;
                (2, v)
            }
            None => return,
        };
        self.plain[slot] = plain;
    }
}

impl ParameterInfo for QuadraturePhaser {
    fn param_count(&self) -> usize {
        HOST_ORDER.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match HOST_ORDER.get(index)? {
            EffectParam::Time => {
                ParamDescriptor::normalized("Rate", "Rate", 0.0, 1.0, INIT_PLAIN[0])
                    .with_id(ParamId(300), "phaser_rate")
            }
            EffectParam::Depth => {
                ParamDescriptor::normalized("Feedback", "Fdbk", -1.0, 1.0, 0.0)
                    .with_id(ParamId(301), "phaser_feedback")
            }
            EffectParam::ShiftDepth => {
                ParamDescriptor::normalized("Stereo Offset", "Offset", 0.0, 1.0, INIT_PLAIN[2])
                    .with_id(ParamId(302), "phaser_offset")
            }
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        self.plain.get(index).copied().unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let (Some(&param), Some(desc)) = (HOST_ORDER.get(index), self.param_info(index)) else {
            return;
        };
        self.param_update(param.raw(), f32_to_q31(desc.clamp(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn mono_block(len: usize) -> Vec<f32> {
        (0..len)
            .flat_map(|i| {
                let x = fourfold_core::sin_turns(i as f32 * 0.013) * 0.5;
                [x, x]
            })
            .collect()
    }

    #[test]
    fn test_init_state() {
        let phaser = QuadraturePhaser::new(SR);
        assert!((phaser.rate() - INIT_RATE_HZ).abs() < 1e-6);
        assert_eq!(phaser.feedback(), 0.0);
        assert_eq!(phaser.stereo_offset(), 0.25);
    }

    #[test]
    fn test_param_mappings() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::Time.raw(), i32::MAX);
        assert!((phaser.rate() - 10.0).abs() < 1e-4);
        phaser.param_update(EffectParam::Time.raw(), 0);
        assert!((phaser.rate() - 0.05).abs() < 1e-6);

        phaser.param_update(EffectParam::Depth.raw(), i32::MIN);
        assert!((phaser.feedback() + 0.9).abs() < 1e-6);
        phaser.param_update(EffectParam::Depth.raw(), f32_to_q31(0.5));
        assert!((phaser.feedback() - 0.45).abs() < 1e-6);

        phaser.param_update(EffectParam::ShiftDepth.raw(), i32::MAX);
        assert!((phaser.stereo_offset() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_unipolar_knobs_clamp() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::Time.raw(), i32::MIN);
        assert!((phaser.rate() - MIN_RATE_HZ).abs() < 1e-6);
        phaser.param_update(EffectParam::ShiftDepth.raw(), i32::MIN);
        assert_eq!(phaser.stereo_offset(), 0.0);
    }

    #[test]
    fn test_unknown_param_ignored() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(3, i32::MAX);
        phaser.param_update(255, i32::MIN);
        assert_eq!(phaser.plain, INIT_PLAIN);
        assert_eq!(phaser.feedback(), 0.0);
    }

    #[test]
    fn test_wet_plus_dry() {
        let mut phaser = QuadraturePhaser::new(SR);
        let mut frames = [0.5_f32, -0.25];
        let mut chain: AllpassChain<STAGES> = AllpassChain::new();
        let mut lfo = Lfo::new(SR, INIT_RATE_HZ);
        lfo.set_waveform(LfoWaveform::Triangle);
        lfo.tick();
        chain.set_frequency(cutoff_for(lfo.sample_unipolar_at(0.0)), SR);
        let wet = chain.process(0.5);
        phaser.process_block(&mut frames);
        assert!((frames[0] - (0.5 + wet)).abs() < 1e-7);
    }

    #[test]
    fn test_zero_offset_mono_in_mono_out() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::ShiftDepth.raw(), 0);
        phaser.param_update(EffectParam::Time.raw(), f32_to_q31(0.5));
        let mut frames = mono_block(4096);
        phaser.process_block(&mut frames);
        for pair in frames.chunks_exact(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_half_cycle_offset_is_antiphase() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::ShiftDepth.raw(), i32::MAX);
        phaser.param_update(EffectParam::Time.raw(), f32_to_q31(0.3));
        let mut frame = [0.0_f32; 2];
        for _ in 0..2000 {
            phaser.process_block(&mut frame);
            let (l, r) = phaser.sweep_controls();
            assert!((l + r - 1.0).abs() < 1e-4, "l={l} r={r}");
        }
    }

    #[test]
    fn test_coefficients_follow_sweep() {
        let mut phaser = QuadraturePhaser::new(SR);
        let mut frames = [0.0_f32; 64];
        phaser.process_block(&mut frames);
        let (ctl_l, ctl_r) = phaser.sweep_controls();
        let (a_l, a_r) = phaser.coefficients();
        assert_eq!(a_l, fourfold_core::allpass::coefficient_for(cutoff_for(ctl_l), SR));
        assert_eq!(a_r, fourfold_core::allpass::coefficient_for(cutoff_for(ctl_r), SR));
        assert_ne!(a_l, a_r);
    }

    #[test]
    fn test_feedback_bounded() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::Depth.raw(), i32::MAX);
        phaser.param_update(EffectParam::Time.raw(), i32::MAX);
        let mut frames = mono_block(48000);
        phaser.process_block(&mut frames);
        assert!(frames.iter().all(|x| x.is_finite() && x.abs() < 20.0));
    }

    #[test]
    fn test_odd_sample_tail_untouched() {
        let mut phaser = QuadraturePhaser::new(SR);
        let mut frames = [0.3_f32; 5];
        phaser.process_block(&mut frames);
        assert_eq!(frames[4], 0.3);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut phaser = QuadraturePhaser::new(SR);
        phaser.param_update(EffectParam::Depth.raw(), f32_to_q31(0.8));
        let mut frames = mono_block(128);
        phaser.process_block(&mut frames);

        phaser.init(0, 0);
        let mut once = phaser.clone();
        phaser.init(0, 0);

        let mut a = mono_block(256);
        let mut b = a.clone();
        phaser.process_block(&mut a);
        once.process_block(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_param_roundtrip() {
        let mut phaser = QuadraturePhaser::new(SR);
        let idx = phaser.param_index_by_string_id("phaser_feedback").unwrap();
        phaser.set_param(idx, -0.5);
        assert!((phaser.get_param(idx) + 0.5).abs() < 1e-6);
        assert!((phaser.feedback() + 0.45).abs() < 1e-6);
        phaser.set_param(idx, 7.0);
        assert!((phaser.feedback() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_defaults_match_init() {
        let phaser = QuadraturePhaser::new(SR);
        for i in 0..phaser.param_count() {
            let desc = phaser.param_info(i).unwrap();
            assert_eq!(phaser.get_param(i), desc.default, "{}", desc.name);
        }
    }
}
