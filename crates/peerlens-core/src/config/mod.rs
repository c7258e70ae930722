//! Configuration types for peerlens.
//!
//! Configuration can be loaded from a YAML file and is then overridden by
//! command-line flags:
//!
//! ```yaml
//! cluster:
//!   hosts: ["10.0.0.1:9042", "10.0.0.2:9042"]
//!   username: cassandra
//!   password_env: CASSANDRA_PASSWORD
//! proxy:
//!   hostname: proxy.example.com
//! query:
//!   statement: SELECT * FROM system.peers_v2
//!   consistency: local_one
//! ```

pub mod cluster;
pub mod proxy;
pub mod query;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use cluster::ClusterConfig;
pub use proxy::ProxyConfig;
pub use query::{Consistency, QueryConfig, UnknownConsistency};

/// Complete peerlens configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerlensConfig {
    /// Cluster contact points and credentials.
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Node address translation.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Statement to run.
    #[serde(default)]
    pub query: QueryConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PeerlensConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Check the settings needed to connect and run the query.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.hosts.is_empty() {
            return Err(ConfigError::Config(
                "at least one cluster host is required".to_string(),
            ));
        }
        if self.query.statement.trim().is_empty() {
            return Err(ConfigError::Config("query statement is empty".to_string()));
        }
        if self.proxy.enabled && self.proxy.hostname.trim().is_empty() {
            return Err(ConfigError::Config(
                "proxy translation is enabled but no proxy hostname is set".to_string(),
            ));
        }
        Ok(())
    }
}
