//! Repository and shop configuration file support.
//!
//! Reads repository selection and shop tuning constants from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::RepositoryError;

/// Top-level configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub shop: ShopSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Shop tuning constants consumed by the availability calculator and queue
/// estimator. All values are configuration constants, never derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Candidate slot granularity in minutes.
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: u32,
    /// Fallback average service duration for wait estimates.
    #[serde(default = "default_service_minutes")]
    pub default_service_minutes: u32,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            slot_step_minutes: default_slot_step_minutes(),
            default_service_minutes: default_service_minutes(),
        }
    }
}

fn default_slot_step_minutes() -> u32 {
    30
}

fn default_service_minutes() -> u32 {
    25
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Searches for `chairside.toml` in the current directory, then the
    /// parent directory. Returns `None` when no file exists.
    pub fn from_default_locations() -> Result<Option<Self>, RepositoryError> {
        for candidate in Self::default_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("chairside.toml"),
            PathBuf::from("../chairside.toml"),
        ]
    }
}
