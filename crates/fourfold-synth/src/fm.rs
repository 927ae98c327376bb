//! Four-operator FM stack.
//!
//! Two independent two-operator stacks whose carriers are crossfaded:
//!
//! ```text
//!  op1 ◄─┐ fb             op3
//!   │ ───┘                 │
//!   │ (depth1 + lfo)·10    │ (depth2 + lfo)·10
//!   ▼                      ▼
//!  op2 (carrier A)        op4 (carrier B)
//!   └──── (1 − bal)·A + bal·B ────► out
//! ```
//!
//! Operator 1 modulates itself with its previous output scaled by the
//! feedback amount. All phases are in turns, so the modulation index adds
//! directly to the carrier phase.
//!
//! # Parameters
//!
//! | Host index | Name | Raw range | Mapping |
//! |------------|------|-----------|---------|
//! | shape | Op1 Ratio | 0..=1023 | `0.25 + v·15.75` |
//! | shift-shape | Depth 1 | 0..=1023 | `v` |
//! | id1 | Feedback | 0..=100 | `0.17·raw/100` |
//! | id2 | Op2 Octave | -2..=2 | ratio in {¼, ½, 1, 2, 4} |
//! | id3 | Op3 Octave | -2..=2 | ratio in {¼, ½, 1, 2, 4} |
//! | id4 | Depth 2 | 0..=100 | `raw/100` |
//! | id5 | Op4 Octave | -2..=2 | ratio in {¼, ½, 1, 2, 4} |
//! | id6 | Balance | 0..=100 | `raw/100` |
//!
//! `v = raw / 1023`. Octave selectors outside `-2..=2` keep the previous ratio.

use fourfold_core::{
    NoteParams, OscParam, OscillatorUnit, ParamDescriptor, ParamId, ParamUnit, ParameterInfo,
    Phase, Unit, f32_to_q31, knob_to_raw, param_val_to_f32, selector_from_raw, selector_to_raw,
    sin_turns,
};

/// Scale from modulation depth to phase deflection in turns.
pub const FM_INDEX: f32 = 10.0;

/// Scale applied to the feedback percentage.
pub const FEEDBACK_SCALE: f32 = 0.17;

/// Lowest operator-1 ratio.
pub const MIN_RATIO: f32 = 0.25;

/// Highest operator-1 ratio.
pub const MAX_RATIO: f32 = 16.0;

/// Knob position closest to operator-1 ratio 1.0, the power-on ratio.
const UNITY_RATIO_KNOB: f32 = 49.0;

/// Host index of each exposed parameter, in introspection order.
const HOST_ORDER: [OscParam; 8] = [
    OscParam::Id1,
    OscParam::Id2,
    OscParam::Id3,
    OscParam::Id4,
    OscParam::Id5,
    OscParam::Id6,
    OscParam::Shape,
    OscParam::ShiftShape,
];

/// Maps an octave selector to its frequency ratio.
///
/// ```rust
/// use fourfold_synth::fm::octave_ratio;
///
/// assert_eq!(octave_ratio(-2), Some(0.25));
/// assert_eq!(octave_ratio(1), Some(2.0));
/// assert_eq!(octave_ratio(3), None);
/// ```
pub const fn octave_ratio(selector: i16) -> Option<f32> {
    match selector {
        -2 => Some(0.25),
        -1 => Some(0.5),
        0 => Some(1.0),
        1 => Some(2.0),
        2 => Some(4.0),
        _ => None,
    }
}

/// Maps a 10-bit shape value to the operator-1 ratio.
#[inline]
pub fn op1_ratio(raw: u16) -> f32 {
    MIN_RATIO + param_val_to_f32(raw) * (MAX_RATIO - MIN_RATIO)
}

/// Host percentages are clamped to `0..=100` before scaling.
#[inline]
fn percent(raw: u16) -> f32 {
    f32::from(raw.min(100)) * 0.01
}

/// Four sine operators in two stacks with a balance crossfade.
///
/// # Example
///
/// ```rust
/// use fourfold_core::{NoteParams, OscParam, OscillatorUnit};
/// use fourfold_synth::FmStack;
///
/// let mut fm = FmStack::new(48000.0);
/// fm.param_update(OscParam::ShiftShape.raw(), 300);
///
/// let params = NoteParams::from_note(60);
/// fm.note_on(&params);
/// let mut out = [0i32; 64];
/// fm.process_block(&params, &mut out);
/// ```
#[derive(Debug, Clone)]
pub struct FmStack {
    sample_rate: f32,
    phases: [Phase; 4],
    /// Operator 1 output from the previous sample.
    op1_last: f32,
    ratios: [f32; 4],
    depth1: f32,
    depth2: f32,
    feedback: f32,
    balance: f32,
    /// Last applied plain value per host index.
    plain: [f32; 8],
}

impl Default for FmStack {
    fn default() -> Self {
        Self::new(fourfold_core::DEFAULT_SAMPLE_RATE)
    }
}

impl FmStack {
    /// Creates an initialized stack.
    pub fn new(sample_rate: f32) -> Self {
        let mut fm = Self {
            sample_rate,
            phases: [Phase::new(); 4],
            op1_last: 0.0,
            ratios: [1.0; 4],
            depth1: 0.0,
            depth2: 0.0,
            feedback: 0.0,
            balance: 0.0,
            plain: [0.0; 8],
        };
        fm.init(0, 0);
        fm
    }

    /// Frequency ratios of operators 1 to 4.
    pub fn ratios(&self) -> [f32; 4] {
        self.ratios
    }

    /// Static modulation depths `(depth1, depth2)`.
    pub fn depths(&self) -> (f32, f32) {
        (self.depth1, self.depth2)
    }

    /// Operator-1 self-feedback amount.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Carrier balance: 0 = carrier A only, 1 = carrier B only.
    pub fn balance(&self) -> f32 {
        self.balance
    }

    /// Current operator phases.
    pub fn phases(&self) -> [f32; 4] {
        self.phases.map(Phase::value)
    }
}

impl Unit for FmStack {
    fn init(&mut self, platform: u32, api: u32) {
        self.phases = [Phase::new(); 4];
        self.op1_last = 0.0;
        self.ratios = [1.0; 4];
        self.depth1 = 0.0;
        self.depth2 = 0.0;
        self.feedback = 0.0;
        self.balance = 0.0;
        self.plain = [0.0; 8];
        self.plain[OscParam::Shape.raw() as usize] = UNITY_RATIO_KNOB;

        #[cfg(feature = "tracing")]
        tracing::debug!(platform, api, "fm stack init");
        #[cfg(not(feature = "tracing"))]
        let _ = (platform, api);
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl OscillatorUnit for FmStack {
    fn process_block(&mut self, params: &NoteParams, out: &mut [i32]) {
        let w0 = params.increment(self.sample_rate);
        let shape_mod = params.shape_mod();
        let index1 = (self.depth1 + shape_mod) * FM_INDEX;
        let index2 = (self.depth2 + shape_mod) * FM_INDEX;
        let incs = self.ratios.map(|r| w0 * r);
        let feedback = self.feedback;
        let balance = self.balance;

        for y in out.iter_mut() {
            let [p1, p2, p3, p4] = self.phases.map(Phase::value);

            let op1 = sin_turns(p1 + self.op1_last * feedback);
            let op2 = sin_turns(p2 + index1 * op1);
            let op3 = sin_turns(p3);
            let op4 = sin_turns(p4 + index2 * op3);
            self.op1_last = op1;

            *y = f32_to_q31((1.0 - balance) * op2 + balance * op4);

            for (phase, inc) in self.phases.iter_mut().zip(incs) {
                phase.advance(inc);
            }
        }
    }

    fn note_on(&mut self, _params: &NoteParams) {
        self.op1_last = 0.0;
        for phase in &mut self.phases {
            phase.reset();
        }
    }

    fn note_off(&mut self, _params: &NoteParams) {}

    fn param_update(&mut self, index: u16, value: u16) {
        let Some(param) = OscParam::from_raw(index) else {
            return;
        };
        let plain = match param {
            OscParam::Shape => {
                self.ratios[0] = op1_ratio(value);
                f32::from(value.min(1023))
            }
            OscParam::ShiftShape => {
                self.depth1 = param_val_to_f32(value);
                f32::from(value.min(1023))
            }
            OscParam::Id1 => {
                self.feedback = FEEDBACK_SCALE * percent(value);
                f32::from(value.min(100))
            }
            OscParam::Id4 => {
                self.depth2 = percent(value);
                f32::from(value.min(100))
            }
            OscParam::Id6 => {
                self.balance = percent(value);
                f32::from(value.min(100))
            }
            OscParam::Id2 | OscParam::Id3 | OscParam::Id5 => {
                let op = match param {
                    OscParam::Id2 => 1,
                    OscParam::Id3 => 2,
                    _ => 3,
                };
                let selector = selector_from_raw(value);
                let Some(ratio) = octave_ratio(selector) else {
                    return;
                };
                self.ratios[op] = ratio;
                f32::from(selector)
            }
        };
        self.plain[param.raw() as usize] = plain;
    }
}

impl ParameterInfo for FmStack {
    fn param_count(&self) -> usize {
        HOST_ORDER.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match HOST_ORDER.get(index)? {
            OscParam::Id1 => ParamDescriptor::selector("Feedback", "FB", 0.0, 100.0, 0.0)
                .with_unit(ParamUnit::Percent)
                .with_id(ParamId(100), "fm_feedback"),
            OscParam::Id2 => ParamDescriptor::selector("Op2 Octave", "Op2 Oct", -2.0, 2.0, 0.0)
                .with_id(ParamId(101), "fm_op2_octave"),
            OscParam::Id3 => ParamDescriptor::selector("Op3 Octave", "Op3 Oct", -2.0, 2.0, 0.0)
                .with_id(ParamId(102), "fm_op3_octave"),
            OscParam::Id4 => ParamDescriptor::selector("Depth 2", "Depth2", 0.0, 100.0, 0.0)
                .with_unit(ParamUnit::Percent)
                .with_id(ParamId(103), "fm_depth2"),
            OscParam::Id5 => ParamDescriptor::selector("Op4 Octave", "Op4 Oct", -2.0, 2.0, 0.0)
                .with_id(ParamId(104), "fm_op4_octave"),
            OscParam::Id6 => ParamDescriptor::selector("Balance", "Balance", 0.0, 100.0, 0.0)
                .with_unit(ParamUnit::Percent)
                .with_id(ParamId(105), "fm_balance"),
            OscParam::Shape => ParamDescriptor::knob("Op1 Ratio", "Op1 Rat")
                .with_default(UNITY_RATIO_KNOB)
                .with_id(ParamId(106), "fm_op1_ratio"),
            OscParam::ShiftShape => {
                ParamDescriptor::knob("Depth 1", "Depth1").with_id(ParamId(107), "fm_depth1")
            }
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        HOST_ORDER
            .get(index)
            .map_or(0.0, |p| self.plain[p.raw() as usize])
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let (Some(&param), Some(desc)) = (HOST_ORDER.get(index), self.param_info(index)) else {
            return;
        };
        let value = desc.clamp(value);
        let raw = match param {
            OscParam::Shape | OscParam::ShiftShape => knob_to_raw(value),
            _ => selector_to_raw(value),
        };
        self.param_update(param.raw(), raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn render(fm: &mut FmStack, params: &NoteParams, frames: usize) -> Vec<i32> {
        let mut out = vec![0; frames];
        fm.process_block(params, &mut out);
        out
    }

    #[test]
    fn test_init_state() {
        let fm = FmStack::new(SR);
        assert_eq!(fm.ratios(), [1.0; 4]);
        assert_eq!(fm.depths(), (0.0, 0.0));
        assert_eq!(fm.feedback(), 0.0);
        assert_eq!(fm.balance(), 0.0);
        assert_eq!(fm.phases(), [0.0; 4]);
    }

    #[test]
    fn test_shape_maps_to_ratio_range() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Shape.raw(), 0);
        assert_eq!(fm.ratios()[0], 0.25);
        fm.param_update(OscParam::Shape.raw(), 1023);
        assert!((fm.ratios()[0] - 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_octave_selectors() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id2.raw(), selector_to_raw(-2.0));
        fm.param_update(OscParam::Id3.raw(), selector_to_raw(1.0));
        fm.param_update(OscParam::Id5.raw(), selector_to_raw(2.0));
        assert_eq!(fm.ratios()[1..], [0.25, 2.0, 4.0]);
    }

    #[test]
    fn test_out_of_range_octave_is_sticky() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id2.raw(), selector_to_raw(-1.0));
        fm.param_update(OscParam::Id2.raw(), selector_to_raw(3.0));
        fm.param_update(OscParam::Id2.raw(), 500);
        assert_eq!(fm.ratios()[1], 0.5);
        assert_eq!(fm.get_param(1), -1.0);
    }

    #[test]
    fn test_percent_params() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id1.raw(), 100);
        fm.param_update(OscParam::Id4.raw(), 50);
        fm.param_update(OscParam::Id6.raw(), 250);
        assert!((fm.feedback() - 0.17).abs() < 1e-6);
        assert!((fm.depths().1 - 0.5).abs() < 1e-6);
        assert_eq!(fm.balance(), 1.0);
    }

    #[test]
    fn test_unknown_param_ignored() {
        let mut fm = FmStack::new(SR);
        let before = fm.clone();
        fm.param_update(8, 1000);
        fm.param_update(u16::MAX, 1000);
        assert_eq!(fm.ratios(), before.ratios());
        assert_eq!(fm.depths(), before.depths());
    }

    #[test]
    fn test_note_on_resets_phases_and_feedback() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id1.raw(), 100);
        let params = NoteParams::from_note(60);
        render(&mut fm, &params, 100);
        assert!(fm.phases()[0] > 0.0);
        fm.note_on(&params);
        assert_eq!(fm.phases(), [0.0; 4]);
        assert_eq!(fm.op1_last, 0.0);
    }

    #[test]
    fn test_note_on_restart_is_deterministic() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id1.raw(), 80);
        fm.param_update(OscParam::ShiftShape.raw(), 700);
        let params = NoteParams::from_note(57);
        fm.note_on(&params);
        let first = render(&mut fm, &params, 256);
        render(&mut fm, &params, 333);
        fm.note_on(&params);
        let second = render(&mut fm, &params, 256);
        assert_eq!(first, second);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id6.raw(), 40);
        render(&mut fm, &NoteParams::from_note(64), 50);
        fm.init(0, 0);
        let once = fm.clone();
        fm.init(1, 2);
        assert_eq!(fm.ratios(), once.ratios());
        assert_eq!(fm.phases(), once.phases());
        assert_eq!(fm.balance(), once.balance());
    }

    #[test]
    fn test_output_length_and_range() {
        let mut fm = FmStack::new(SR);
        fm.param_update(OscParam::Id1.raw(), 100);
        fm.param_update(OscParam::ShiftShape.raw(), 1023);
        fm.param_update(OscParam::Id6.raw(), 50);
        for frames in [1, 17, 64] {
            let out = render(&mut fm, &NoteParams::from_note(72), frames);
            assert_eq!(out.len(), frames);
        }
    }

    #[test]
    fn test_parameter_update_idempotent() {
        let mut a = FmStack::new(SR);
        let mut b = FmStack::new(SR);
        for (index, raw) in [(6_u16, 512_u16), (1, selector_to_raw(-1.0)), (0, 30)] {
            a.param_update(index, raw);
            b.param_update(index, raw);
            b.param_update(index, raw);
        }
        assert_eq!(a.ratios(), b.ratios());
        assert_eq!(a.feedback(), b.feedback());
        assert_eq!(a.plain, b.plain);
    }

    #[test]
    fn test_set_param_plain_values() {
        let mut fm = FmStack::new(SR);
        let ratio = fm.param_index_by_string_id("fm_op1_ratio").unwrap();
        fm.set_param(ratio, 1023.0);
        assert!((fm.ratios()[0] - 16.0).abs() < 1e-5);
        let oct = fm.param_index_by_string_id("fm_op4_octave").unwrap();
        fm.set_param(oct, -7.0);
        assert_eq!(fm.ratios()[3], 0.25);
        assert_eq!(fm.get_param(oct), -2.0);
    }

    #[test]
    fn test_defaults_match_init() {
        let mut fm = FmStack::new(SR);
        for i in 0..fm.param_count() {
            let desc = fm.param_info(i).unwrap();
            assert_eq!(fm.get_param(i), desc.default, "{}", desc.name);
        }
        assert!(fm.param_info(8).is_none());
        fm.apply_defaults();
        assert_eq!(fm.ratios()[1..], [1.0, 1.0, 1.0]);
    }
}
