//! Preset management for fourfold units.
//!
//! A preset names one unit and a set of plain parameter values keyed by
//! `string_id`. This crate loads and saves presets as TOML, validates them
//! against the unit descriptors in the registry, and applies them to live
//! units.
//!
//! # Example
//!
//! ```rust,no_run
//! use fourfold_config::{Preset, UnitRegistry, get_factory_preset};
//!
//! // Start from a factory preset and tweak it
//! let preset = get_factory_preset("supersaw")
//!     .unwrap()
//!     .with_param("uni_sub", 300.0);
//! preset.save("my_supersaw.toml").unwrap();
//!
//! // Load it back and build the unit
//! let preset = Preset::load("my_supersaw.toml").unwrap();
//! let unit = preset.instantiate(&UnitRegistry::new()).unwrap();
//! ```

mod error;
mod preset;

/// Unit and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, FileOp};
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, factory_presets_for,
    get_factory_preset, is_factory_preset,
};
pub use preset::Preset;
pub use validation::{
    UnitValidator, ValidationError, ValidationResult, check_sample_rate, validate_preset,
    validate_unit,
};

/// Re-export the registry types presets are applied to.
pub use fourfold_registry::{UnitDescriptor, UnitInstance, UnitKind, UnitRegistry};
