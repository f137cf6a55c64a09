//! Server configuration types.

use serde::Deserialize;

/// How operation failures map onto HTTP status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCodePolicy {
    /// Every failure is 400, an unhandled operation is 405.
    #[default]
    Uniform,
    /// 400 for bad input, 404 for absent records, 500 for storage failures.
    Split,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port for the HTTP API.
    pub port: u16,
    /// Status code mapping for failures.
    pub status_codes: StatusCodePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            status_codes: StatusCodePolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
