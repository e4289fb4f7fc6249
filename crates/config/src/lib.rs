//! Cluster topology configuration for shardadm.
//!
//! Declares which hosts exist, in which order status aggregation reports
//! them, and where each host's admin API is reachable.

use serde::{Deserialize, Serialize};
use shardadm_common::HostId;
use std::collections::HashSet;
use std::time::Duration;

/// Top-level cluster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Known hosts. The order here is the order `service_status`
    /// aggregation reports them in.
    pub hosts: Vec<HostEntry>,

    /// Deadline for one host's status query during aggregation, in
    /// milliseconds.
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
}

/// One host declaration: its identifier and the base URL of its admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEntry {
    pub id: String,
    pub url: String,
}

// --- Defaults ---

fn default_status_timeout_ms() -> u64 {
    5000
}

// --- Loading ---

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ClusterConfig {
    /// Validate that configuration values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.hosts {
            if entry.id.is_empty() {
                return Err(ConfigError::Invalid("host id must be non-empty".into()));
            }
            if entry.url.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "host {} has an empty url",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate host id: {}",
                    entry.id
                )));
            }
        }
        if self.status_timeout_ms == 0 {
            return Err(ConfigError::Invalid("status_timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    /// All declared host ids, in declaration order.
    pub fn host_ids(&self) -> Vec<HostId> {
        self.hosts.iter().map(|h| HostId::new(&h.id)).collect()
    }

    /// Base URL of one host's admin API, if the host is declared.
    pub fn base_url(&self, host: &HostId) -> Option<&str> {
        self.hosts
            .iter()
            .find(|h| h.id == host.as_str())
            .map(|h| h.url.as_str())
    }

    /// The per-host status query deadline.
    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }
}

/// Load a `ClusterConfig` from a YAML file path.
pub fn load_from_file(path: &std::path::Path) -> Result<ClusterConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Load a `ClusterConfig` from a YAML string.
pub fn load_from_str(yaml: &str) -> Result<ClusterConfig, ConfigError> {
    let config: ClusterConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
