//! Unit and preset validation.
//!
//! Parameter metadata comes straight from the units: the validator creates
//! one instance per unit id through the registry and caches its
//! descriptors.
//!
//! ```rust
//! use fourfold_config::{UnitValidator, validate_unit};
//!
//! validate_unit("phaser").expect("phaser is registered");
//!
//! let mut validator = UnitValidator::new();
//! let index = validator.validate_param("unison", "uni_voices", 5.0).unwrap();
//! assert_eq!(index, 2);
//! assert!(validator.validate_param("unison", "uni_voices", 9.0).is_err());
//! ```

use fourfold_core::{ParamDescriptor, ParameterInfo};
use fourfold_registry::UnitRegistry;
use std::collections::HashMap;
use thiserror::Error;

use crate::Preset;

/// Lowest sample rate a preset may request.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest sample rate a preset may request.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Highest MIDI note a preset may request.
pub const MAX_PRESET_NOTE: u8 = 127;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unit id not in the registry.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// No parameter with this `string_id` on the unit.
    #[error("unknown parameter '{param}' for unit '{unit}'")]
    UnknownParameter {
        /// Unit id.
        unit: String,
        /// The unrecognized parameter id.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter `string_id`.
        param: String,
        /// The rejected value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Sample rate outside the supported range.
    #[error("sample rate {0} Hz outside [8000, 192000]")]
    SampleRate(u32),

    /// Note number above the MIDI range.
    #[error("note {0} above 127")]
    Note(u8),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validator for units and their parameters.
///
/// Caches each unit's descriptors so repeated checks do not recreate units.
pub struct UnitValidator {
    registry: UnitRegistry,
    param_cache: HashMap<String, Vec<ParamDescriptor>>,
}

impl Default for UnitValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self {
            registry: UnitRegistry::new(),
            param_cache: HashMap::new(),
        }
    }

    /// Validate that a unit id exists.
    pub fn validate_unit(&self, unit: &str) -> ValidationResult<()> {
        if self.registry.descriptor(unit).is_some() {
            Ok(())
        } else {
            Err(ValidationError::UnknownUnit(unit.to_string()))
        }
    }

    /// Parameter descriptors of a unit, in index order.
    pub fn unit_params(&mut self, unit: &str) -> Option<&[ParamDescriptor]> {
        if !self.param_cache.contains_key(unit) {
            let instance = self
                .registry
                .create(unit, fourfold_core::DEFAULT_SAMPLE_RATE)?;
            let params = (0..instance.param_count())
                .filter_map(|i| instance.param_info(i))
                .collect();
            self.param_cache.insert(unit.to_string(), params);
        }
        self.param_cache.get(unit).map(Vec::as_slice)
    }

    /// Checks one plain parameter value and returns its index.
    pub fn validate_param(
        &mut self,
        unit: &str,
        string_id: &str,
        value: f32,
    ) -> ValidationResult<usize> {
        self.validate_unit(unit)?;
        let params = self
            .unit_params(unit)
            .ok_or_else(|| ValidationError::UnknownUnit(unit.to_string()))?;
        let (index, desc) = params
            .iter()
            .enumerate()
            .find(|(_, d)| d.string_id == string_id)
            .ok_or_else(|| ValidationError::UnknownParameter {
                unit: unit.to_string(),
                param: string_id.to_string(),
            })?;
        check_range(desc, value)?;
        Ok(index)
    }

    /// Validates every field of a preset, collecting all errors.
    pub fn validate_preset(&mut self, preset: &Preset) -> ValidationResult<()> {
        self.validate_unit(&preset.unit)?;

        let mut errors = Vec::new();
        if let Err(e) = check_sample_rate(preset.sample_rate) {
            errors.push(e);
        }
        if preset.note > MAX_PRESET_NOTE {
            errors.push(ValidationError::Note(preset.note));
        }
        for (string_id, &value) in &preset.params {
            if let Err(e) = self.validate_param(&preset.unit, string_id, value) {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

/// Rejects sample rates outside `MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE`.
pub fn check_sample_rate(sample_rate: u32) -> ValidationResult<()> {
    if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        Ok(())
    } else {
        Err(ValidationError::SampleRate(sample_rate))
    }
}

/// Rejects values outside the descriptor range.
pub fn check_range(desc: &ParamDescriptor, value: f32) -> ValidationResult<()> {
    if desc.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Validate that a unit id exists.
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    UnitValidator::new().validate_unit(unit)
}

/// Validate a complete preset.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    UnitValidator::new().validate_preset(preset)
}
