//! Unison sawtooth ensemble with a sub-oscillator.
//!
//! Up to [`MAX_VOICES`] band-limited saws are spread symmetrically around the
//! note. Voice `i` gets the signed index `k(i) = (−1)^(i+1)·i`
//! (0, +1, −2, +3, −4, +5, −6) and advances by
//!
//! ```text
//! inc_i = w0·(1 + detune·k/voices) + beating·k/voices
//! ```
//!
//! The detune term scales with the note; the beating term is an absolute
//! offset, so it produces the same beat rate at every pitch. Each voice is
//! weighted `1/voices`, keeping the summed level independent of the voice
//! count. A saw one octave down is then crossfaded in by the sub amount.
//!
//! Phases free-run across notes; note-on does not realign the voices.
//!
//! # Parameters
//!
//! | Host index | Name | Raw range | Mapping |
//! |------------|------|-----------|---------|
//! | shape | Detune | 0..=1023 | `v·0.05` |
//! | shift-shape | Sub Mix | 0..=1023 | `v·0.5` |
//! | id1 | Voices | 0..=6 | `raw + 1` |
//! | id2 | Beating | 0..=100 | `raw·1e-5` turns per sample |
//! | id3..id6 | (none) | | accepted and ignored |

use fourfold_core::{
    NoteParams, OscParam, OscillatorUnit, ParamDescriptor, ParamId, ParameterInfo, Phase, Unit,
    bl_saw, f32_to_q31, knob_to_raw, param_val_to_f32, selector_to_raw,
};

/// Largest voice count.
pub const MAX_VOICES: usize = 7;

/// Detune at full shape, as a fraction of the note increment.
pub const MAX_DETUNE: f32 = 0.05;

/// Sub mix at full shift-shape.
pub const MAX_SUB: f32 = 0.5;

/// Beating increment per raw step.
pub const BEATING_SCALE: f32 = 0.00001;

const HOST_ORDER: [OscParam; 4] = [
    OscParam::Shape,
    OscParam::ShiftShape,
    OscParam::Id1,
    OscParam::Id2,
];

/// Signed detune index of voice `i`: 0, +1, −2, +3, −4, +5, −6.
///
/// ```rust
/// use fourfold_synth::unison::detune_index;
///
/// let ks: Vec<i32> = (0..7).map(detune_index).collect();
/// assert_eq!(ks, [0, 1, -2, 3, -4, 5, -6]);
/// ```
pub const fn detune_index(i: usize) -> i32 {
    let magnitude = i as i32;
    if i % 2 == 1 { magnitude } else { -magnitude }
}

/// Supersaw: up to seven detuned band-limited saws plus a sub octave.
///
/// # Example
///
/// ```rust
/// use fourfold_core::{NoteParams, OscParam, OscillatorUnit};
/// use fourfold_synth::UnisonSaw;
///
/// let mut saw = UnisonSaw::new(48000.0);
/// saw.param_update(OscParam::Id1.raw(), 6); // seven voices
/// saw.param_update(OscParam::Shape.raw(), 400);
///
/// let mut out = [0i32; 128];
/// saw.process_block(&NoteParams::from_note(45), &mut out);
/// ```
#[derive(Debug, Clone)]
pub struct UnisonSaw {
    sample_rate: f32,
    phases: [Phase; MAX_VOICES],
    sub_phase: Phase,
    voices: usize,
    voices_inv: f32,
    detune: f32,
    beating: f32,
    sub: f32,
    /// Last applied plain value, in `HOST_ORDER` order.
    plain: [f32; 4],
}

impl Default for UnisonSaw {
    fn default() -> Self {
        Self::new(fourfold_core::DEFAULT_SAMPLE_RATE)
    }
}

impl UnisonSaw {
    /// Creates an initialized ensemble with one voice.
    pub fn new(sample_rate: f32) -> Self {
        let mut saw = Self {
            sample_rate,
            phases: [Phase::new(); MAX_VOICES],
            sub_phase: Phase::new(),
            voices: 1,
            voices_inv: 1.0,
            detune: 0.0,
            beating: 0.0,
            sub: 0.0,
            plain: [0.0; 4],
        };
        saw.init(0, 0);
        saw
    }

    /// Active voice count, `1..=7`.
    pub fn voices(&self) -> usize {
        self.voices
    }

    /// Per-voice mix weight, `1 / voices`.
    pub fn voice_weight(&self) -> f32 {
        self.voices_inv
    }

    /// Detune amount (fraction of the note increment).
    pub fn detune(&self) -> f32 {
        self.detune
    }

    /// Beating increment in turns per sample.
    pub fn beating(&self) -> f32 {
        self.beating
    }

    /// Sub-oscillator mix.
    pub fn sub(&self) -> f32 {
        self.sub
    }

    /// Per-sample increment of voice `i` for base increment `w0`.
    #[inline]
    pub fn voice_increment(&self, i: usize, w0: f32) -> f32 {
        let k = detune_index(i) as f32;
        w0 * (1.0 + self.detune * self.voices_inv * k) + self.beating * self.voices_inv * k
    }

    fn set_voices(&mut self, raw: u16) {
        self.voices = usize::from(raw.min(MAX_VOICES as u16 - 1)) + 1;
        self.voices_inv = 1.0 / self.voices as f32;
    }
}

impl Unit for UnisonSaw {
    fn init(&mut self, platform: u32, api: u32) {
        self.phases = [Phase::new(); MAX_VOICES];
        self.sub_phase = Phase::new();
        self.set_voices(0);
        self.detune = 0.0;
        self.beating = 0.0;
        self.sub = 0.0;
        self.plain = [0.0, 0.0, 1.0, 0.0];

        #[cfg(feature = "tracing")]
        tracing::debug!(platform, api, "unison saw init");
        #[cfg(not(feature = "tracing"))]
        let _ = (platform, api);
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl OscillatorUnit for UnisonSaw {
    fn process_block(&mut self, params: &NoteParams, out: &mut [i32]) {
        let w0 = params.increment(self.sample_rate);
        let voices = self.voices;
        let weight = self.voices_inv;
        let sub = self.sub;
        let sub_inc = w0 * 0.5;

        let mut incs = [0.0_f32; MAX_VOICES];
        for (i, inc) in incs.iter_mut().enumerate().take(voices) {
            *inc = self.voice_increment(i, w0);
        }

        for y in out.iter_mut() {
            let mut mix = 0.0;
            for (phase, &inc) in self.phases[..voices].iter_mut().zip(&incs) {
                mix += bl_saw(phase.value(), inc) * weight;
                phase.advance(inc);
            }
            let sub_saw = bl_saw(self.sub_phase.value(), sub_inc);
            self.sub_phase.advance(sub_inc);

            *y = f32_to_q31((1.0 - sub) * mix + sub * sub_saw);
        }
    }

    fn note_on(&mut self, _params: &NoteParams) {}

    fn note_off(&mut self, _params: &NoteParams) {}

    fn param_update(&mut self, index: u16, value: u16) {
        let (slot, plain) = match OscParam::from_raw(index) {
            Some(OscParam::Shape) => {
                self.detune = param_val_to_f32(value) * MAX_DETUNE;
                (0, f32::from(value.min(1023)))
            }
            Some(OscParam::ShiftShape) => {
                self.sub = param_val_to_f32(value) * MAX_SUB;
                (1, f32::from(value.min(1023)))
            }
            Some(OscParam::Id1) => {
                self.set_voices(value);
                (2, self.voices as f32)
            }
            Some(OscParam::Id2) => {
                let raw = value.min(100);
                self.beating = f32::from(raw) * BEATING_SCALE;
                (3, f32::from(raw))
            }
            _ => return,
        };
        self.plain[slot] = plain;
    }
}

impl ParameterInfo for UnisonSaw {
    fn param_count(&self) -> usize {
        HOST_ORDER.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match HOST_ORDER.get(index)? {
            OscParam::Shape => {
                ParamDescriptor::knob("Detune", "Detune").with_id(ParamId(200), "uni_detune")
            }
            OscParam::ShiftShape => {
                ParamDescriptor::knob("Sub Mix", "Sub").with_id(ParamId(201), "uni_sub")
            }
            OscParam::Id1 => ParamDescriptor::selector("Voices", "Voices", 1.0, 7.0, 1.0)
                .with_id(ParamId(202), "uni_voices"),
            _ => ParamDescriptor::selector("Beating", "Beat", 0.0, 100.0, 0.0)
                .with_id(ParamId(203), "uni_beating"),
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
        let value = desc.clamp(value);
        let raw = match param {
            OscParam::Shape | OscParam::ShiftShape => knob_to_raw(value),
            // Voice count is sent as count - 1
            OscParam::Id1 => selector_to_raw(value - 1.0),
            _ => selector_to_raw(value),
        };
        self.param_update(param.raw(), raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourfold_core::q31_to_f32;

    const SR: f32 = 48000.0;

    #[test]
    fn test_detune_index_sequence() {
        let ks = [0, 1, -2, 3, -4, 5, -6];
        for (i, &k) in ks.iter().enumerate() {
            assert_eq!(detune_index(i), k);
        }
    }

    #[test]
    fn test_voice_count_mapping() {
        let mut saw = UnisonSaw::new(SR);
        assert_eq!(saw.voices(), 1);
        saw.param_update(OscParam::Id1.raw(), 0);
        assert_eq!(saw.voices(), 1);
        saw.param_update(OscParam::Id1.raw(), 6);
        assert_eq!(saw.voices(), 7);
        saw.param_update(OscParam::Id1.raw(), 200);
        assert_eq!(saw.voices(), MAX_VOICES);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let mut saw = UnisonSaw::new(SR);
        for raw in 0..7 {
            saw.param_update(OscParam::Id1.raw(), raw);
            let total = saw.voice_weight() * saw.voices() as f32;
            assert!((total - 1.0).abs() < 1e-6, "{} voices sum to {total}", saw.voices());
        }
    }

    #[test]
    fn test_voice_increments_symmetric_spread() {
        let mut saw = UnisonSaw::new(SR);
        saw.param_update(OscParam::Id1.raw(), 6);
        saw.param_update(OscParam::Shape.raw(), 1023);
        let w0 = 0.01;
        assert_eq!(saw.voice_increment(0, w0), w0);
        let up = saw.voice_increment(1, w0) - w0;
        let down = saw.voice_increment(2, w0) - w0;
        assert!(up > 0.0 && down < 0.0);
        assert!((down + 2.0 * up).abs() < 1e-7);
        // Full detune with seven voices: 0.05 / 7 per index step
        assert!((up - w0 * 0.05 / 7.0).abs() < 1e-8);
    }

    #[test]
    fn test_beating_is_absolute_offset() {
        let mut saw = UnisonSaw::new(SR);
        saw.param_update(OscParam::Id1.raw(), 2);
        saw.param_update(OscParam::Id2.raw(), 30);
        let spread_low = saw.voice_increment(1, 0.001) - 0.001;
        let spread_high = saw.voice_increment(1, 0.02) - 0.02;
        assert!((spread_low - spread_high).abs() < 1e-8);
        assert!((spread_low - 30.0 * BEATING_SCALE / 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_single_voice_is_plain_saw() {
        let mut saw = UnisonSaw::new(SR);
        let params = NoteParams::from_note(69);
        let w0 = params.increment(SR);
        let mut out = [0i32; 512];
        saw.process_block(&params, &mut out);

        let mut phase = Phase::new();
        for &y in &out {
            assert_eq!(y, f32_to_q31(bl_saw(phase.value(), w0)));
            phase.advance(w0);
        }
    }

    #[test]
    fn test_sub_crossfade() {
        let mut saw = UnisonSaw::new(SR);
        saw.param_update(OscParam::ShiftShape.raw(), 1023);
        assert!((saw.sub() - 0.5).abs() < 1e-6);
        let params = NoteParams::from_note(60);
        let mut out = [0i32; 256];
        saw.process_block(&params, &mut out);

        let w0 = params.increment(SR);
        let mut main = Phase::new();
        let mut sub = Phase::new();
        for &y in &out {
            let expected = 0.5 * bl_saw(main.value(), w0) + 0.5 * bl_saw(sub.value(), w0 * 0.5);
            assert!((q31_to_f32(y) - expected).abs() < 1e-6);
            main.advance(w0);
            sub.advance(w0 * 0.5);
        }
    }

    #[test]
    fn test_note_on_does_not_reset_phases() {
        let mut saw = UnisonSaw::new(SR);
        let params = NoteParams::from_note(60);
        let mut out = [0i32; 100];
        saw.process_block(&params, &mut out);
        let before = saw.phases[0].value();
        saw.note_on(&params);
        assert_eq!(saw.phases[0].value(), before);
        assert!(before > 0.0);
    }

    #[test]
    fn test_ignored_params() {
        let mut saw = UnisonSaw::new(SR);
        let before = saw.clone();
        for index in 2..6 {
            saw.param_update(index, 77);
        }
        saw.param_update(42, 77);
        assert_eq!(saw.plain, before.plain);
        assert_eq!(saw.voices(), before.voices());
    }

    #[test]
    fn test_set_param_voice_count() {
        let mut saw = UnisonSaw::new(SR);
        let idx = saw.param_index_by_string_id("uni_voices").unwrap();
        saw.set_param(idx, 5.0);
        assert_eq!(saw.voices(), 5);
        assert_eq!(saw.get_param(idx), 5.0);
        saw.set_param(idx, 0.0);
        assert_eq!(saw.voices(), 1);
    }

    #[test]
    fn test_defaults_match_init() {
        let saw = UnisonSaw::new(SR);
        for i in 0..saw.param_count() {
            let desc = saw.param_info(i).unwrap();
            assert_eq!(saw.get_param(i), desc.default, "{}", desc.name);
        }
    }
}
