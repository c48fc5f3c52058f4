//! Graph configuration
//!
//! Configuration is an explicit value handed to [`SparseRowGraph::with_config`]
//! and to the persistence helpers. It can be built in code or loaded from YAML:
//!
//! ```yaml
//! bounds_check: always
//! parallel_threshold: 8192
//! row_capacity: 27
//! snapshot:
//!   compress: true
//! ```
//!
//! [`SparseRowGraph::with_config`]: crate::graph::SparseRowGraph::with_config

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How row-index preconditions are checked.
///
/// An out-of-range row is a programming error. With `DebugOnly` the
/// descriptive check is compiled out of optimized builds, so a bad index in
/// release only surfaces as the generic slice-index panic. It never turns
/// into an unchecked memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsCheck {
    /// Descriptive check under `debug_assertions` only
    #[default]
    DebugOnly,
    /// Descriptive check in every build
    Always,
}

impl BoundsCheck {
    /// Whether the descriptive check runs in this build
    #[inline]
    pub fn enabled(self) -> bool {
        match self {
            BoundsCheck::Always => true,
            BoundsCheck::DebugOnly => cfg!(debug_assertions),
        }
    }
}

/// Checkpoint options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Gzip the snapshot body
    pub compress: bool,
}

/// Sparse row graph configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Row-index precondition checking
    pub bounds_check: BoundsCheck,
    /// Row count from which export and merge run row-parallel
    pub parallel_threshold: usize,
    /// Initial capacity of every row set (0 = grow on demand)
    pub row_capacity: usize,
    /// Checkpoint options
    pub snapshot: SnapshotConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            bounds_check: BoundsCheck::default(),
            parallel_threshold: 4096,
            row_capacity: 0,
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        debug!("Loaded graph config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Always run the descriptive bounds check
    pub fn checked(mut self) -> Self {
        self.bounds_check = BoundsCheck::Always;
        self
    }
}
