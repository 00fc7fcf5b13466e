use serde::{Deserialize, Serialize};

use super::defaults;

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl ApiConfig {
    /// `host:port` string suitable for a listener bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_API_HOST.to_string(),
            port: defaults::DEFAULT_API_PORT,
        }
    }
}
