/*!
Resolver configuration.

The only tunables are immutable: which topology to scan and which port name to assume
when an accelerated port is requested without one. Missing fields fall back to the defaults.
*/

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::options::{DEFAULT_ACCELERATED_PORT, OVSDB_TOPOLOGY_ID};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Could not parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Topology whose snapshot is scanned for bridges and management nodes.
    pub topology_id: String,
    /// Port name used by accelerated-port lookups when the caller does not supply one.
    pub default_accelerated_port: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            topology_id: OVSDB_TOPOLOGY_ID.to_string(),
            default_accelerated_port: DEFAULT_ACCELERATED_PORT.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }
}
