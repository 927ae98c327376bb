//! Parameter introspection for host-agnostic control of units.
//!
//! Units speak the host's raw encodings on the audio path (10-bit knobs, small
//! signed selectors, q31 values). Everything outside the audio path (presets,
//! the CLI, tests) addresses parameters through [`ParameterInfo`] using *plain*
//! values in the ranges given by each [`ParamDescriptor`]. Each unit converts a
//! plain value back to its raw encoding and runs the same update path the host
//! would.
//!
//! # Example
//!
//! ```rust
//! use fourfold_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Level {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::normalized("Level", "Level", 0.0, 1.0, 0.5)
//!                 .with_id(ParamId(900), "lvl_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.level } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.level = value.clamp(0.0, 1.0);
//!         }
//!     }
//! }
//!
//! let mut level = Level { level: 0.5 };
//! let idx = level.param_index_by_string_id("lvl_level").unwrap();
//! level.set_param(idx, 2.0);
//! assert_eq!(level.get_param(idx), 1.0);
//! ```

use crate::sample_format::PARAM_VALUE_MAX;

/// Stable numeric parameter identifier.
///
/// # Convention
///
/// Each unit gets a base ID; params are sequential from there:
/// - FM stack: 100..
/// - Unison saw: 200..
/// - Phaser: 300..
/// - Chorus: 400..
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags. Use [`union`](Self::union) to combine.
///
/// ```rust
/// use fourfold_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps.
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for units that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index; the index must be stable for
/// the lifetime of the unit. `set_param` takes a plain value, clamps it to the
/// descriptor range and applies it through the unit's raw update path.
pub trait ParameterInfo {
    /// Returns the number of parameters this unit exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the last plain value applied to the parameter at `index`.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index` from a plain value. Out-of-range indices
    /// are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Finds a parameter index by its `string_id`.
    ///
    /// Scans all parameters; meant for setup paths, not audio.
    fn param_index_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count())
            .find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }

    /// Applies every descriptor's default value.
    fn apply_defaults(&mut self) {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i) {
                self.set_param(i, desc.default);
            }
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Detune", "Sweep Rate").
    pub name: &'static str,

    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed plain value.
    pub min: f32,

    /// Maximum allowed plain value.
    pub max: f32,

    /// Plain value matching the unit's state after `init`.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID for preset persistence.
    pub id: ParamId,

    /// Human-readable stable ID used as the preset key (e.g. `"fm_ratio"`).
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// A 10-bit oscillator knob: plain value is the raw position `0..=1023`.
    pub fn knob(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: f32::from(PARAM_VALUE_MAX),
            default: 0.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// An integer selector in `[min, max]`.
    pub fn selector(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// A continuous value in `[min, max]`.
    pub fn normalized(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Sets `id` and `string_id`.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the default plain value.
    pub const fn with_default(mut self, default: f32) -> Self {
        self.default = default;
        self
    }

    /// Sets the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Clamps a value to the valid range.
    ///
    /// ```rust
    /// use fourfold_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::knob("Shape", "Shape");
    /// assert_eq!(desc.clamp(-5.0), 0.0);
    /// assert_eq!(desc.clamp(2000.0), 1023.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Converts a plain value to `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// Converts `[0, 1]` back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Percentage (%).
    Percent,
    /// No unit.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}
