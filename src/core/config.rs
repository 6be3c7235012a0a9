//=========================================================================
// Pool Configuration
//=========================================================================
//
// Settings shared by a pool registry.
//
// Built in code through `with_*` setters, or loaded from TOML:
//
// ```toml
// grouping_enabled = true
// default_ceiling = 32
// root_group_name = "Pool"
// ```
//
// Missing fields fall back to their defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Defaults ============================================================

/// Ceiling used by `acquire` when none is given.
pub const DEFAULT_CEILING: usize = 50;

/// Name of the top-level group idle instances are placed under.
pub const DEFAULT_ROOT_GROUP: &str = "Pool";

//=== ConfigError =========================================================

/// Errors raised while loading a [`PoolConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The contents are not valid TOML for this config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A ceiling of zero would make every key steal from itself.
    #[error("default_ceiling must be at least 1, got {0}")]
    InvalidCeiling(usize),
}

//=== PoolConfig ==========================================================

/// Registry-wide pool settings.
///
/// # Default Values
///
/// - **grouping_enabled**: `false`
/// - **default_ceiling**: 50
/// - **root_group_name**: `"Pool"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Attach idle instances to per-key groups under a root group.
    pub grouping_enabled: bool,

    /// Maximum in-use instances per key before reuse/steal takes over.
    pub default_ceiling: usize,

    /// Name of the root group.
    pub root_group_name: String,
}

impl PoolConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self {
            grouping_enabled: false,
            default_ceiling: DEFAULT_CEILING,
            root_group_name: DEFAULT_ROOT_GROUP.to_string(),
        }
    }

    /// Enables or disables grouping placement.
    ///
    /// Default: `false`
    pub fn with_grouping(mut self, enabled: bool) -> Self {
        self.grouping_enabled = enabled;
        self
    }

    /// Sets the ceiling used by `acquire`.
    ///
    /// Default: 50
    ///
    /// # Panics
    ///
    /// Panics if `ceiling == 0`.
    pub fn with_default_ceiling(mut self, ceiling: usize) -> Self {
        assert!(ceiling > 0, "Default ceiling must be positive");
        self.default_ceiling = ceiling;
        self
    }

    /// Sets the root group name.
    pub fn with_root_group_name(mut self, name: impl Into<String>) -> Self {
        self.root_group_name = name.into();
        self
    }

    //--- Loading ----------------------------------------------------------

    /// Parses a config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_ceiling == 0 {
            return Err(ConfigError::InvalidCeiling(self.default_ceiling));
        }
        Ok(self)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
