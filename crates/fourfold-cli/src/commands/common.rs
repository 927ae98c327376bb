//! Shared CLI helpers used across multiple commands.

use anyhow::{Context, bail};
use fourfold_config::validation::check_range;
use fourfold_config::{
    Preset, UnitInstance, UnitRegistry, check_sample_rate, get_factory_preset,
};
use fourfold_core::ParameterInfo;
use std::path::PathBuf;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a preset by factory name or file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = PathBuf::from(name);
    if path.exists() {
        return Ok(Preset::load(&path)?);
    }

    bail!(
        "Preset '{}' not found. Use 'fourfold presets list' to see available presets.",
        name
    )
}

/// Creates `unit_id` at `sample_rate`, then applies the preset and the
/// `key=value` overrides in that order.
///
/// Override keys match a parameter's `string_id` first, then its name or
/// short name.
pub fn build_unit(
    unit_id: &str,
    sample_rate: u32,
    preset: Option<&Preset>,
    overrides: &[(String, String)],
) -> anyhow::Result<UnitInstance> {
    check_sample_rate(sample_rate)?;
    let registry = UnitRegistry::new();
    let mut unit = registry.create(unit_id, sample_rate as f32).with_context(|| {
        format!(
            "Unknown unit: {}. Use 'fourfold units' to see available units.",
            unit_id
        )
    })?;

    if let Some(preset) = preset {
        if preset.unit != unit_id {
            bail!(
                "Preset '{}' targets unit '{}', not '{}'",
                preset.name,
                preset.unit,
                unit_id
            );
        }
        preset.apply(&mut unit)?;
        tracing::info!(preset = %preset.name, unit = unit_id, "applied preset");
    }

    for (key, raw) in overrides {
        let index = unit
            .param_index_by_string_id(key)
            .or_else(|| unit.find_param_by_name(key))
            .with_context(|| format!("Unknown parameter '{}' for unit '{}'", key, unit_id))?;
        let value: f32 = raw
            .parse()
            .with_context(|| format!("Invalid value '{}' for parameter '{}'", raw, key))?;
        if let Some(desc) = unit.param_info(index) {
            check_range(&desc, value)?;
        }
        unit.set_param(index, value);
    }

    Ok(unit)
}

/// Peak absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Converts a linear amplitude to dBFS, floored at -120.
pub fn linear_to_db(value: f32) -> f32 {
    if value <= 1e-6 {
        -120.0
    } else {
        20.0 * value.log10()
    }
}
