//! Unit registry and factory for fourfold.
//!
//! Offline hosts (the CLI, preset tooling, tests) look units up by a short
//! id and get back a [`UnitInstance`]: an enum over the three host shapes,
//! each holding a boxed unit. Parameter introspection works the same for all
//! of them through [`ParameterInfo`].
//!
//! # Example
//!
//! ```rust
//! use fourfold_core::ParameterInfo;
//! use fourfold_registry::{UnitInstance, UnitKind, UnitRegistry};
//!
//! let registry = UnitRegistry::new();
//! for unit in registry.all_units() {
//!     println!("{}: {}", unit.id, unit.name);
//! }
//!
//! let mut chorus = registry.create("chorus", 48000.0).unwrap();
//! assert_eq!(chorus.kind(), UnitKind::ModulationEffect);
//! let depth = chorus.param_index_by_string_id("chorus_depth").unwrap();
//! chorus.set_param(depth, 0.5);
//!
//! for unit in registry.units_of_kind(UnitKind::Oscillator) {
//!     println!("oscillator: {}", unit.name);
//! }
//! ```
//!
//! # no_std Support
//!
//! The registry needs `alloc` but not `std`:
//!
//! ```toml
//! [dependencies]
//! fourfold-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use fourfold_core::{
    InsertEffect, ModulationEffect, OscillatorUnit, ParamDescriptor, ParameterInfo, Unit,
};
use fourfold_effects::{QuadraturePhaser, TriPhaseChorus};
use fourfold_synth::{FmStack, UnisonSaw};

/// Host shape of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Note-driven mono source
    Oscillator,
    /// In-place stereo effect
    InsertEffect,
    /// Effect with main and sub stereo buses
    ModulationEffect,
}

impl UnitKind {
    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            UnitKind::Oscillator => "Oscillator",
            UnitKind::InsertEffect => "Insert Effect",
            UnitKind::ModulationEffect => "Modulation Effect",
        }
    }

    /// One-line description of the host contract.
    pub const fn description(&self) -> &'static str {
        match self {
            UnitKind::Oscillator => "Renders q31 mono blocks from note and pitch input",
            UnitKind::InsertEffect => "Rewrites an interleaved stereo buffer in place",
            UnitKind::ModulationEffect => "Reads main and sub stereo buses, writes both outputs",
        }
    }
}

/// Describes a unit in the registry.
#[derive(Debug, Clone)]
pub struct UnitDescriptor {
    /// Unique identifier (lowercase, no spaces).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Host shape.
    pub kind: UnitKind,
    /// Number of parameters.
    pub param_count: usize,
}

/// A live unit, tagged by host shape.
pub enum UnitInstance {
    /// Oscillator unit
    Oscillator(Box<dyn OscillatorUnit + Send>),
    /// Insert effect unit
    InsertEffect(Box<dyn InsertEffect + Send>),
    /// Modulation effect unit
    ModulationEffect(Box<dyn ModulationEffect + Send>),
}

macro_rules! dispatch {
    ($self:expr, $unit:ident => $body:expr) => {
        match $self {
            UnitInstance::Oscillator($unit) => $body,
            UnitInstance::InsertEffect($unit) => $body,
            UnitInstance::ModulationEffect($unit) => $body,
        }
    };
}

impl UnitInstance {
    /// Host shape of this instance.
    pub fn kind(&self) -> UnitKind {
        match self {
            UnitInstance::Oscillator(_) => UnitKind::Oscillator,
            UnitInstance::InsertEffect(_) => UnitKind::InsertEffect,
            UnitInstance::ModulationEffect(_) => UnitKind::ModulationEffect,
        }
    }

    /// Resets the unit. See [`Unit::init`](fourfold_core::Unit::init).
    pub fn init(&mut self, platform: u32, api: u32) {
        dispatch!(self, unit => unit.init(platform, api));
    }

    /// Sample rate the unit was built for.
    pub fn sample_rate(&self) -> f32 {
        dispatch!(self, unit => unit.sample_rate())
    }

    /// The oscillator, if this is one.
    pub fn as_oscillator_mut(&mut self) -> Option<&mut (dyn OscillatorUnit + Send + 'static)> {
        match self {
            UnitInstance::Oscillator(unit) => Some(unit.as_mut()),
            _ => None,
        }
    }

    /// The insert effect, if this is one.
    pub fn as_insert_effect_mut(&mut self) -> Option<&mut (dyn InsertEffect + Send + 'static)> {
        match self {
            UnitInstance::InsertEffect(unit) => Some(unit.as_mut()),
            _ => None,
        }
    }

    /// The modulation effect, if this is one.
    pub fn as_modulation_effect_mut(
        &mut self,
    ) -> Option<&mut (dyn ModulationEffect + Send + 'static)> {
        match self {
            UnitInstance::ModulationEffect(unit) => Some(unit.as_mut()),
            _ => None,
        }
    }
}

impl core::fmt::Debug for UnitInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnitInstance")
            .field("kind", &self.kind())
            .field("params", &self.param_count())
            .finish()
    }
}

impl ParameterInfo for UnitInstance {
    fn param_count(&self) -> usize {
        dispatch!(self, unit => unit.param_count())
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        dispatch!(self, unit => unit.param_info(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        dispatch!(self, unit => unit.get_param(index))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        dispatch!(self, unit => unit.set_param(index, value));
    }
}

/// Factory function type for creating units.
type UnitFactory = fn(f32) -> UnitInstance;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: UnitDescriptor,
    factory: UnitFactory,
}

/// Registry of every built-in unit.
pub struct UnitRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Creates a registry with all built-in units registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(4),
        };
        registry.register_builtin_units();
        registry
    }

    fn register_builtin_units(&mut self) {
        self.register(
            UnitDescriptor {
                id: "fm4",
                name: "FM Operator Stack",
                description: "Four sine operators in two FM pairs with op1 feedback",
                kind: UnitKind::Oscillator,
                param_count: 8,
            },
            |sr| UnitInstance::Oscillator(Box::new(FmStack::new(sr))),
        );

        self.register(
            UnitDescriptor {
                id: "unison",
                name: "Unison Saw Ensemble",
                description: "Up to seven detuned band-limited saws with a sub octave",
                kind: UnitKind::Oscillator,
                param_count: 4,
            },
            |sr| UnitInstance::Oscillator(Box::new(UnisonSaw::new(sr))),
        );

        self.register(
            UnitDescriptor {
                id: "phaser",
                name: "Quadrature Phaser",
                description: "Stereo four-stage all-pass phaser with feedback",
                kind: UnitKind::InsertEffect,
                param_count: 3,
            },
            |sr| UnitInstance::InsertEffect(Box::new(QuadraturePhaser::new(sr))),
        );

        self.register(
            UnitDescriptor {
                id: "chorus",
                name: "Tri-Phase Chorus",
                description: "Three-tap ensemble chorus driven by slow and fast LFOs",
                kind: UnitKind::ModulationEffect,
                param_count: 2,
            },
            |sr| UnitInstance::ModulationEffect(Box::new(TriPhaseChorus::new(sr))),
        );
    }

    fn register(&mut self, descriptor: UnitDescriptor, factory: UnitFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered units.
    pub fn all_units(&self) -> Vec<&UnitDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for units of one host shape.
    pub fn units_of_kind(&self, kind: UnitKind) -> Vec<&UnitDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.kind == kind)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by unit id.
    pub fn descriptor(&self, id: &str) -> Option<&UnitDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Creates an initialized unit by id.
    ///
    /// Returns `None` if the id is not registered.
    pub fn create(&self, id: &str, sample_rate: f32) -> Option<UnitInstance> {
        let entry = self.entries.iter().find(|e| e.descriptor.id == id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(unit = id, sample_rate, "creating unit");

        Some((entry.factory)(sample_rate))
    }

    /// Finds a parameter index by name or short name for a given unit.
    ///
    /// Creates a temporary instance to scan its descriptors.
    pub fn param_index_by_name(&self, unit_id: &str, param_name: &str) -> Option<usize> {
        self.create(unit_id, fourfold_core::DEFAULT_SAMPLE_RATE)?
            .find_param_by_name(param_name)
    }

    /// Returns the number of registered units.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no units are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
