//! Preset file format and operations.

use fourfold_core::ParameterInfo;
use fourfold_registry::{UnitInstance, UnitRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, FileOp};
use crate::validation::{ValidationError, check_range, check_sample_rate};

/// A saved parameter state for one unit.
///
/// Parameters are keyed by their stable `string_id` and hold *plain* values
/// (knob positions, selector integers, or normalized effect values), the
/// same values [`ParameterInfo::set_param`] takes.
///
/// # TOML Format
///
/// ```toml
/// name = "Glass Bell"
/// description = "Inharmonic op1 ratio with a touch of feedback"
/// unit = "fm4"
/// sample_rate = 48000
/// note = 72
///
/// [params]
/// fm_op1_ratio = 226.0
/// fm_depth1 = 380.0
/// fm_feedback = 10.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry id of the unit this preset targets.
    pub unit: String,

    /// Sample rate hint (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Note an offline render plays (defaults to middle C).
    #[serde(default = "default_note")]
    pub note: u8,

    /// Plain parameter values by `string_id`.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_note() -> u8 {
    60
}

impl Preset {
    /// Create an empty preset for `unit`.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            unit: unit.into(),
            sample_rate: default_sample_rate(),
            note: default_note(),
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the render note.
    pub fn with_note(mut self, note: u8) -> Self {
        self.note = note;
        self
    }

    /// Set one plain parameter value.
    pub fn with_param(mut self, string_id: impl Into<String>, value: f32) -> Self {
        self.params.insert(string_id.into(), value);
        self
    }

    /// Captures the current parameter values of a live unit.
    pub fn from_unit(
        name: impl Into<String>,
        unit_id: impl Into<String>,
        unit: &UnitInstance,
    ) -> Self {
        let params = (0..unit.param_count())
            .filter_map(|i| {
                let desc = unit.param_info(i)?;
                Some((desc.string_id.to_string(), unit.get_param(i)))
            })
            .collect();
        Self {
            params,
            sample_rate: whole_hz(unit.sample_rate()),
            ..Self::new(name, unit_id)
        }
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(FileOp::Read, path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(FileOp::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(FileOp::Write, path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Applies every parameter to `unit`.
    ///
    /// All values are checked first; on error the unit is left untouched.
    pub fn apply(&self, unit: &mut UnitInstance) -> Result<(), ConfigError> {
        let mut resolved = Vec::with_capacity(self.params.len());
        for (string_id, &value) in &self.params {
            let index = unit.param_index_by_string_id(string_id).ok_or_else(|| {
                ValidationError::UnknownParameter {
                    unit: self.unit.clone(),
                    param: string_id.clone(),
                }
            })?;
            if let Some(desc) = unit.param_info(index) {
                check_range(&desc, value)?;
            }
            resolved.push((index, value));
        }

        for (index, value) in resolved {
            unit.set_param(index, value);
        }
        Ok(())
    }

    /// Creates the target unit at the preset's sample rate and applies the
    /// preset to it.
    ///
    /// Fails with [`ValidationError::SampleRate`] when the rate is outside
    /// the supported range.
    pub fn instantiate(&self, registry: &UnitRegistry) -> Result<UnitInstance, ConfigError> {
        check_sample_rate(self.sample_rate)?;
        let mut unit = registry
            .create(&self.unit, self.sample_rate as f32)
            .ok_or_else(|| ConfigError::UnknownUnit(self.unit.clone()))?;
        self.apply(&mut unit)?;
        Ok(unit)
    }
}

fn whole_hz(sample_rate: f32) -> u32 {
    sample_rate.round().max(0.0) as u32
}
