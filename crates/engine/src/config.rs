//! Engine configuration via `nodestore.toml`
//!
//! A single config file controls how the graph resolves competing primary
//! parents, which store new nodes land in by default, and search limits.

use nodestore_core::{Error, Result, StoreRef};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Config file name placed in the repository data directory.
pub const CONFIG_FILE_NAME: &str = "nodestore.toml";

/// Store used when the config does not name one.
pub const DEFAULT_STORE: &str = "workspace://SpacesStore";

/// What happens when a child that already has a primary parent gets another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryPolicy {
    /// Refuse the new primary association
    #[default]
    Reject,
    /// Turn the existing primary association into a secondary one
    Demote,
}

/// Search limits persisted under `[search]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Upper bound on hits returned by one query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    1000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Engine configuration loaded from `nodestore.toml`.
///
/// # Example
///
/// ```toml
/// primary_policy = "reject"
/// default_store = "workspace://SpacesStore"
///
/// [search]
/// max_results = 1000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Primary-parent conflict policy: `"reject"` or `"demote"`.
    #[serde(default)]
    pub primary_policy: PrimaryPolicy,
    /// Store new nodes are created in when none is given.
    #[serde(default = "default_store_str")]
    pub default_store: String,
    /// Search limits.
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_store_str() -> String {
    DEFAULT_STORE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_policy: PrimaryPolicy::default(),
            default_store: default_store_str(),
            search: SearchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse `default_store` into a `StoreRef`.
    pub fn default_store(&self) -> Result<StoreRef> {
        StoreRef::parse(&self.default_store).map_err(|e| {
            Error::Config(format!(
                "Invalid default_store '{}' in {}: {}",
                self.default_store, CONFIG_FILE_NAME, e
            ))
        })
    }

    /// Check every field that can be wrong after parsing.
    pub fn validate(&self) -> Result<()> {
        self.default_store()?;
        if self.search.max_results == 0 {
            return Err(Error::Config(
                "search.max_results must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# NodeStore configuration
#
# Primary parent policy: "reject" (default) or "demote"
#   "reject" = a second primary parent association is refused
#   "demote" = the existing primary association becomes secondary
primary_policy = "reject"

# Store that new nodes are created in when none is given
default_store = "workspace://SpacesStore"

[search]
# Upper bound on hits returned by one query
max_results = 1000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        info!(
            path = %path.display(),
            policy = ?config.primary_policy,
            store = %config.default_store,
            "Loaded engine config"
        );
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
