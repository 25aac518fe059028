//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the request dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Deployment environment, consulted for the TLS verification fallback.
    pub environment: Environment,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// TLS verification settings for the HTTP client path.
    pub tls: TlsConfig,

    /// HTTP client transport settings.
    pub http_client: HttpClientConfig,

    /// Raw socket transport settings.
    pub raw_socket: RawSocketConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    Testing,
    #[default]
    Development,
    Local,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Testing => "testing",
            Environment::Development => "development",
            Environment::Local => "local",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "testing" | "test" => Ok(Environment::Testing),
            "development" | "dev" => Ok(Environment::Development),
            "local" => Ok(Environment::Local),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Default request deadline in seconds, shared by both transports.
    pub request_secs: f64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs_f64(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30.0 }
    }
}

/// TLS verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    /// Explicit verification switch. When unset, verification is strict in
    /// production and disabled everywhere else.
    pub verify: Option<bool>,
}

/// HTTP client transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { system_proxy: true }
    }
}

/// Raw socket transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RawSocketConfig {
    /// Port used when the target URL carries none.
    pub default_port: u16,

    /// Delay before closing the socket after the request is written.
    pub linger_ms: u64,

    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for RawSocketConfig {
    fn default() -> Self {
        Self {
            default_port: 80,
            linger_ms: 0,
            user_agent: "AppLocalServer".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeouts.request(), Duration::from_secs(30));
        assert_eq!(config.raw_socket.default_port, 80);
        assert_eq!(config.raw_socket.user_agent, "AppLocalServer");
        assert!(config.tls.verify.is_none());
        assert!(config.http_client.system_proxy);
    }

    #[test]
    fn test_minimal_toml() {
        let config: DispatcherConfig = toml::from_str("environment = \"production\"").unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.timeouts.request_secs, 30.0);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" staging ".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa".parse::<Environment>().is_err());
    }
}
