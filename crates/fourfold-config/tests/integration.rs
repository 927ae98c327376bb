//! Integration tests for fourfold-config.
//!
//! These cover the file round-trip and driving real units from presets.

use fourfold_config::{
    ConfigError, FileOp, Preset, UnitInstance, UnitRegistry, ValidationError, factory_presets,
    get_factory_preset, validate_preset,
};
use fourfold_core::{
    InsertEffect, ModulationEffect, NoteParams, OscillatorUnit, ParameterInfo, q31_to_f32,
};
use tempfile::TempDir;

fn render_oscillator(osc: &mut (dyn OscillatorUnit + Send), note: u8, frames: usize) -> Vec<f32> {
    let params = NoteParams::from_note(note);
    osc.note_on(&params);
    let mut out = vec![0i32; frames];
    for block in out.chunks_mut(64) {
        osc.process_block(&params, block);
    }
    out.into_iter().map(q31_to_f32).collect()
}

#[test]
fn test_save_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("bell.toml");

    let preset = get_factory_preset("glass_bell").unwrap();
    preset.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Preset::load(temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { op: FileOp::Read, .. }));
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "name = \"Broken\"\nunit = [1, 2").unwrap();
    assert!(matches!(
        Preset::load(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_every_factory_preset_instantiates_and_runs() {
    let registry = UnitRegistry::new();
    for preset in factory_presets() {
        assert!(validate_preset(&preset).is_ok(), "{}", preset.name);
        let mut unit = preset.instantiate(&registry).unwrap();

        for (string_id, &value) in &preset.params {
            let index = unit.param_index_by_string_id(string_id).unwrap();
            let step = unit.param_info(index).unwrap().step;
            assert!(
                (unit.get_param(index) - value).abs() <= step,
                "{}::{string_id} = {} after apply",
                preset.name,
                unit.get_param(index)
            );
        }

        match &mut unit {
            UnitInstance::Oscillator(osc) => {
                let out = render_oscillator(osc.as_mut(), preset.note, 4800);
                assert!(out.iter().all(|x| x.is_finite()));
                assert!(out.iter().any(|&x| x != 0.0), "{} is silent", preset.name);
            }
            UnitInstance::InsertEffect(fx) => {
                let mut frames: Vec<f32> = (0..4800).map(|i| ((i % 50) as f32 - 25.0) * 0.02).collect();
                fx.process_block(&mut frames);
                assert!(frames.iter().all(|x| x.is_finite()));
            }
            UnitInstance::ModulationEffect(fx) => {
                let input: Vec<f32> = (0..4800).map(|i| ((i % 50) as f32 - 25.0) * 0.02).collect();
                let mut out = vec![0.0; input.len()];
                let mut sub = vec![0.0; input.len()];
                fx.process_block(&input, &mut out, &input, &mut sub);
                assert!(out.iter().all(|x| x.is_finite()));
            }
        }
    }
}

#[test]
fn test_invalid_preset_file_rejected_on_apply() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("loud.toml");
    std::fs::write(
        &path,
        "name = \"Loud\"\nunit = \"phaser\"\n\n[params]\nphaser_feedback = 3.0\n",
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    assert!(matches!(
        validate_preset(&preset),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        preset.instantiate(&UnitRegistry::new()),
        Err(ConfigError::Validation(ValidationError::OutOfRange { .. }))
    ));
}

#[test]
fn test_instantiate_rejects_unsupported_sample_rate() {
    let registry = UnitRegistry::new();
    for rate in [0, 16, 7999, 192_001] {
        let preset =
            Preset::from_toml(&format!("name = \"p\"\nunit = \"phaser\"\nsample_rate = {rate}"))
                .unwrap();
        assert!(matches!(
            preset.instantiate(&registry),
            Err(ConfigError::Validation(ValidationError::SampleRate(r))) if r == rate
        ));
    }
}

#[test]
fn test_phaser_at_tiny_sample_rate_does_not_panic() {
    let mut unit = UnitRegistry::new().create("phaser", 16.0).unwrap();
    let UnitInstance::InsertEffect(fx) = &mut unit else {
        panic!("phaser is an insert effect");
    };
    let mut frames = [0.1f32; 8];
    fx.process_block(&mut frames);
    assert!(frames.iter().all(|x| x.is_finite()));
}

#[test]
fn test_snapshot_roundtrip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let registry = UnitRegistry::new();
    let mut unit = registry.create("chorus", 48000.0).unwrap();
    let depth = unit.param_index_by_string_id("chorus_depth").unwrap();
    unit.set_param(depth, 0.5);

    let path = temp_dir.path().join("snap.toml");
    Preset::from_unit("Snap", "chorus", &unit).save(&path).unwrap();
    let restored = Preset::load(&path).unwrap().instantiate(&registry).unwrap();
    assert!((restored.get_param(depth) - 0.5).abs() < 1e-6);
}
