//! Three-voice ensemble chorus.
//!
//! The input is low-passed at 12 kHz and written into a stereo delay line.
//! Two sine LFOs, one slow and one fast, are each sampled at three taps 120°
//! apart. Tap `n` reads the delay line at
//!
//! ```text
//! offset_n = 960 + slow_n·slow_depth + fast_n·fast_depth
//! ```
//!
//! and the three reads are averaged. The output is fully wet. The sub bus
//! is copied through untouched.
//!
//! # Parameters
//!
//! | Host index | Name | Plain range | Mapping |
//! |------------|------|-------------|---------|
//! | time | Rate | 0..=1 | slow `0.13 + 3.89·v` Hz, fast `1.18 + 13.27·v` Hz |
//! | depth | Depth | 0..=1 | slow `49.92·v`, fast `24.96·v` frames |
//! | shift-depth | (none) | | accepted and ignored |

use fourfold_core::{
    Biquad, BiquadCoefficients, EffectParam, Lfo, ModulationEffect, ParamDescriptor, ParamId,
    ParameterInfo, StereoDelayLine, StereoFrame, TRI_PHASE_OFFSETS, Unit, f32_to_q31, q31_to_f32,
};

/// Half-delay length in frames (10 ms at 48 kHz).
pub const HALF_DELAY_FRAMES: usize = 480;

/// Delay memory, four half-delay lengths.
pub const DELAY_CAPACITY: usize = 4 * HALF_DELAY_FRAMES;

/// Resting read offset, two half-delay lengths.
pub const CENTER_FRAMES: usize = 2 * HALF_DELAY_FRAMES;

/// Slow LFO swing at full depth, in frames.
pub const SLOW_DEPTH_MAX: f32 = 0.104 * HALF_DELAY_FRAMES as f32;

/// Fast LFO swing at full depth, in frames.
pub const FAST_DEPTH_MAX: f32 = 0.052 * HALF_DELAY_FRAMES as f32;

/// Whole-frame bound on the combined swing of both LFOs.
pub const MAX_SWING_FRAMES: usize = 75;

/// Pre-filter corner.
pub const LPF_CUTOFF_HZ: f32 = 12000.0;

/// Pre-filter Q (Butterworth).
pub const LPF_Q: f32 = 0.707;

const SLOW_MIN_HZ: f32 = 0.13;
const SLOW_SPAN_HZ: f32 = 3.89;
const FAST_MIN_HZ: f32 = 1.18;
const FAST_SPAN_HZ: f32 = 13.27;
const TAP_WEIGHT: f32 = 1.0 / 3.0;

type Delay = StereoDelayLine<DELAY_CAPACITY>;

const _: () = assert!(SLOW_DEPTH_MAX + FAST_DEPTH_MAX <= MAX_SWING_FRAMES as f32);
const _: () = assert!(MAX_SWING_FRAMES <= CENTER_FRAMES);
const _: () = assert!(CENTER_FRAMES + MAX_SWING_FRAMES <= Delay::MAX_READ_OFFSET);

const HOST_ORDER: [EffectParam; 2] = [EffectParam::Time, EffectParam::Depth];

/// Tri-phase chorus over a shared stereo delay line.
///
/// # Example
///
/// ```rust
/// use fourfold_core::{EffectParam, ModulationEffect, f32_to_q31};
/// use fourfold_effects::TriPhaseChorus;
///
/// let mut chorus = TriPhaseChorus::new(48000.0);
/// chorus.param_update(EffectParam::Depth.raw(), f32_to_q31(0.7));
///
/// let input = [0.1_f32; 128];
/// let mut main_out = [0.0_f32; 128];
/// let mut sub_out = [0.0_f32; 128];
/// chorus.process_block(&input, &mut main_out, &input, &mut sub_out);
/// ```
#[derive(Debug, Clone)]
pub struct TriPhaseChorus {
    sample_rate: f32,
    lowpass: [Biquad; 2],
    delay: Delay,
    slow: Lfo,
    fast: Lfo,
    slow_depth: f32,
    fast_depth: f32,
    /// Last applied plain value, in `HOST_ORDER` order.
    plain: [f32; 2],
}

impl Default for TriPhaseChorus {
    fn default() -> Self {
        Self::new(fourfold_core::DEFAULT_SAMPLE_RATE)
    }
}

impl TriPhaseChorus {
    /// Creates an initialized chorus.
    pub fn new(sample_rate: f32) -> Self {
        let mut chorus = Self {
            sample_rate,
            lowpass: [Biquad::default(), Biquad::default()],
            delay: Delay::new(),
            slow: Lfo::new(sample_rate, SLOW_MIN_HZ),
            fast: Lfo::new(sample_rate, FAST_MIN_HZ),
            slow_depth: 0.0,
            fast_depth: 0.0,
            plain: [0.0; 2],
        };
        chorus.init(0, 0);
        chorus
    }

    /// `(slow, fast)` LFO rates in Hz.
    pub fn rates(&self) -> (f32, f32) {
        (self.slow.frequency(), self.fast.frequency())
    }

    /// `(slow, fast)` swing in frames.
    pub fn depths(&self) -> (f32, f32) {
        (self.slow_depth, self.fast_depth)
    }

    /// Read offsets of the three taps for the current LFO phases.
    pub fn tap_offsets(&self) -> [f32; 3] {
        let slow = self.slow.sample_taps(TRI_PHASE_OFFSETS);
        let fast = self.fast.sample_taps(TRI_PHASE_OFFSETS);
        let mut offsets = [CENTER_FRAMES as f32; 3];
        for ((offset, s), f) in offsets.iter_mut().zip(slow).zip(fast) {
            *offset += s * self.slow_depth + f * self.fast_depth;
        }
        offsets
    }

    /// Moves both LFOs to the given phases. Used by tests that sweep the offset range.
    pub fn set_lfo_phases(&mut self, slow: f32, fast: f32) {
        self.slow.set_phase(slow);
        self.fast.set_phase(fast);
    }

    fn process_frame(&mut self, left: f32, right: f32) -> StereoFrame {
        let filtered = (self.lowpass[0].process(left), self.lowpass[1].process(right));
        self.delay.write(filtered);

        self.slow.tick();
        self.fast.tick();

        let (mut sum_l, mut sum_r) = (0.0, 0.0);
        for offset in self.tap_offsets() {
            let (l, r) = self.delay.read_frac(offset);
            sum_l += l;
            sum_r += r;
        }
        (sum_l * TAP_WEIGHT, sum_r * TAP_WEIGHT)
    }
}

impl Unit for TriPhaseChorus {
    fn init(&mut self, platform: u32, api: u32) {
        let cutoff = LPF_CUTOFF_HZ.min(self.sample_rate * 0.45);
        let coeffs = BiquadCoefficients::lowpass(cutoff, LPF_Q, self.sample_rate);
        self.lowpass = [Biquad::new(coeffs), Biquad::new(coeffs)];
        self.delay.clear();
        self.slow.set_frequency(SLOW_MIN_HZ);
        self.fast.set_frequency(FAST_MIN_HZ);
        self.slow.reset();
        self.fast.reset();
        self.slow_depth = 0.0;
        self.fast_depth = 0.0;
        self.plain = [0.0; 2];

        #[cfg(feature = "tracing")]
        tracing::debug!(platform, api, cutoff, "tri-phase chorus init");
        #[cfg(not(feature = "tracing"))]
        let _ = (platform, api);
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl ModulationEffect for TriPhaseChorus {
    fn process_block(
        &mut self,
        main_in: &[f32],
        main_out: &mut [f32],
        sub_in: &[f32],
        sub_out: &mut [f32],
    ) {
        for (input, output) in main_in.chunks_exact(2).zip(main_out.chunks_exact_mut(2)) {
            let (l, r) = self.process_frame(input[0], input[1]);
            output[0] = l;
            output[1] = r;
        }

        let n = sub_in.len().min(sub_out.len());
        sub_out[..n].copy_from_slice(&sub_in[..n]);
    }

    fn param_update(&mut self, index: u8, value: i32) {
        let v = q31_to_f32(value).clamp(0.0, 1.0);
        let slot = match EffectParam::from_raw(index) {
            Some(EffectParam::Time) => {
                self.slow.set_frequency(SLOW_MIN_HZ + SLOW_SPAN_HZ * v);
                self.fast.set_frequency(FAST_MIN_HZ + FAST_SPAN_HZ * v);
                0
            }
            Some(EffectParam::Depth) => {
                self.slow_depth = SLOW_DEPTH_MAX * v;
                self.fast_depth = FAST_DEPTH_MAX * v;
                1
            }
            _ => return,
        };
        self.plain[slot] = v;
    }
}

impl ParameterInfo for TriPhaseChorus {
    fn param_count(&self) -> usize {
        HOST_ORDER.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match HOST_ORDER.get(index)? {
            EffectParam::Time => ParamDescriptor::normalized("Rate", "Rate", 0.0, 1.0, 0.0)
                .with_id(ParamId(400), "chorus_rate"),
            _ => ParamDescriptor::normalized("Depth", "Depth", 0.0, 1.0, 0.0)
                .with_id(ParamId(401), "chorus_depth"),
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
