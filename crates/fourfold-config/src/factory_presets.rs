//! Factory presets bundled with the library.
//!
//! Two starting points per unit, always available without external files.

use crate::Preset;

/// Factory preset names, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "glass_bell",
    "growl_bass",
    "supersaw",
    "sub_stack",
    "slow_sweep",
    "wide_jet",
    "ensemble",
    "flutter",
];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("glass_bell", GLASS_BELL),
    ("growl_bass", GROWL_BASS),
    ("supersaw", SUPERSAW),
    ("sub_stack", SUB_STACK),
    ("slow_sweep", SLOW_SWEEP),
    ("wide_jet", WIDE_JET),
    ("ensemble", ENSEMBLE),
    ("flutter", FLUTTER),
];

const GLASS_BELL: &str = r#"
name = "Glass Bell"
description = "Inharmonic op1 ratio with octave-spread carriers"
unit = "fm4"
note = 72

[params]
fm_op1_ratio = 226
fm_depth1 = 380
fm_feedback = 10
fm_op2_octave = 0
fm_op3_octave = 1
fm_depth2 = 35
fm_op4_octave = 2
fm_balance = 40
"#;

const GROWL_BASS: &str = r#"
name = "Growl Bass"
description = "Unity-ratio feedback stack an octave down"
unit = "fm4"
note = 36

[params]
fm_op1_ratio = 49
fm_depth1 = 600
fm_feedback = 45
fm_op2_octave = -1
fm_op3_octave = -1
fm_depth2 = 20
fm_op4_octave = -2
fm_balance = 30
"#;

const SUPERSAW: &str = r#"
name = "Supersaw"
description = "Seven voices, wide detune, slow beating"
unit = "unison"
note = 57

[params]
uni_voices = 7
uni_detune = 520
uni_sub = 0
uni_beating = 12
"#;

const SUB_STACK: &str = r#"
name = "Sub Stack"
description = "Three tight voices over a strong sub octave"
unit = "unison"
note = 45

[params]
uni_voices = 3
uni_detune = 180
uni_sub = 900
uni_beating = 4
"#;

const SLOW_SWEEP: &str = r#"
name = "Slow Sweep"
description = "Quarter-cycle stereo sweep with moderate resonance"
unit = "phaser"

[params]
phaser_rate = 0.02
phaser_feedback = 0.5
phaser_offset = 0.5
"#;

const WIDE_JET: &str = r#"
name = "Wide Jet"
description = "Half-cycle offset and strong negative feedback"
unit = "phaser"

[params]
phaser_rate = 0.05
phaser_feedback = -0.8
phaser_offset = 1.0
"#;

const ENSEMBLE: &str = r#"
name = "Ensemble"
description = "Slow lush three-voice chorus"
unit = "chorus"

[params]
chorus_rate = 0.15
chorus_depth = 0.6
"#;

const FLUTTER: &str = r#"
name = "Flutter"
description = "Fast rates and full depth for a vibrato wobble"
unit = "chorus"

[params]
chorus_rate = 0.7
chorus_depth = 1.0
"#;

/// All factory presets, in listing order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by key or display name (case-insensitive).
///
/// ```rust
/// use fourfold_config::get_factory_preset;
///
/// let preset = get_factory_preset("supersaw").unwrap();
/// assert_eq!(preset.unit, "unison");
/// assert!(get_factory_preset("Glass Bell").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (key, toml) in FACTORY_PRESETS_TOML {
        if key.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    factory_presets()
        .into_iter()
        .find(|p| p.name.to_lowercase() == name_lower)
}

/// Factory presets targeting one unit.
pub fn factory_presets_for(unit: &str) -> Vec<Preset> {
    factory_presets()
        .into_iter()
        .filter(|p| p.unit == unit)
        .collect()
}

/// Factory preset keys.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Returns true if `name` matches a factory preset key or display name.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
