//! Proxy translation configuration types.

use serde::{Deserialize, Serialize};

/// How node addresses are rewritten before dialing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether discovered node addresses are translated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hostname of the proxy every node is reached through.
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hostname: default_hostname(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_hostname() -> String {
    "proxy.com".to_string()
}
