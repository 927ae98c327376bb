//! Error types for preset and file operations.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationError;

/// File-system step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a preset file.
    Read,
    /// Writing a preset file.
    Write,
    /// Creating the parent directory of a preset file.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create directory",
        })
    }
}

/// Errors from loading, saving, and applying presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file-system operation on `path` failed.
    #[error("cannot {op} '{}': {source}", .path.display())]
    Io {
        /// Which step failed.
        op: FileOp,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preset text is not valid TOML or misses required fields.
    #[error("invalid preset TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Preset could not be encoded as TOML.
    #[error("cannot encode preset as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Unit id not in the registry.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Preset values rejected by the unit's parameter ranges.
    #[error("invalid preset: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    pub(crate) fn io(op: FileOp, path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
