//! Cluster connection configuration types.
//!
//! Contact points and credentials for the Cassandra/ScyllaDB cluster. The
//! password can be given directly or through an environment variable; the
//! environment variable wins when it is set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the cluster connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Seed nodes as `host:port`.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Username for password authentication.
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for password authentication.
    #[serde(default = "default_password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password.
    /// Takes precedence over `password`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            username: default_username(),
            password: default_password(),
            password_env: None,
        }
    }
}

impl ClusterConfig {
    /// Split a comma-separated seed list, dropping blank entries.
    pub fn parse_hosts(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Get the password, checking password_env first.
    pub fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }
}

/// Loggable view with the password masked.
impl fmt::Display for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = match (&self.password_env, &self.password) {
            (Some(env_var), _) => format!("${env_var}"),
            (None, Some(_)) => "****".to_string(),
            (None, None) => "<none>".to_string(),
        };
        write!(
            f,
            "hosts=[{}] username={} password={}",
            self.hosts.join(", "),
            self.username,
            password
        )
    }
}

// Default value functions
fn default_hosts() -> Vec<String> {
    vec!["127.0.0.1:9042".to_string()]
}

fn default_username() -> String {
    "cassandra".to_string()
}

fn default_password() -> Option<String> {
    Some("cassandra".to_string())
}
