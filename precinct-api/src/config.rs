//! API Configuration Module
//!
//! Listener address, CORS and request-size settings. Configuration is loaded
//! from environment variables with defaults suitable for local development.

use std::net::SocketAddr;
use thiserror::Error;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Problems found while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid port value: {0}")]
    InvalidPort(String),

    #[error("Invalid bind address {addr}: {reason}")]
    InvalidBindAddress { addr: String, reason: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface to bind.
    pub bind_host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Largest accepted request body.
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PRECINCT_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `PRECINCT_API_PORT`: Listen port (default: 3000)
    /// - `PRECINCT_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PRECINCT_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `PRECINCT_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `PRECINCT_BODY_LIMIT_BYTES`: Request body limit (default: 1 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("PRECINCT_API_BIND")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("PRECINCT_API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let cors_origins = lookup("PRECINCT_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("PRECINCT_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs =
            parse_var(&lookup, "PRECINCT_CORS_MAX_AGE_SECS", defaults.cors_max_age_secs)?;

        let body_limit_bytes =
            parse_var(&lookup, "PRECINCT_BODY_LIMIT_BYTES", defaults.body_limit_bytes)?;
        if body_limit_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PRECINCT_BODY_LIMIT_BYTES",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            body_limit_bytes,
        })
    }

    /// Resolve the socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddress {
                reason: e.to_string(),
                addr,
            })
    }

    /// Whether CORS is restricted to an explicit origin list.
    pub fn has_strict_cors(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.body_limit_bytes, 1024 * 1024);
        assert!(!config.has_strict_cors());
    }

    #[test]
    fn test_port_prefers_generic_variable() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("PRECINCT_API_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);

        let config = ApiConfig::from_lookup(lookup_from(&[("PRECINCT_API_PORT", "9090")])).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert_eq!(
            ApiConfig::from_lookup(lookup_from(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert!(matches!(
            ApiConfig::from_lookup(lookup_from(&[("PRECINCT_CORS_MAX_AGE_SECS", "-1")])),
            Err(ConfigError::InvalidValue { var: "PRECINCT_CORS_MAX_AGE_SECS", .. })
        ));
        assert!(ApiConfig::from_lookup(lookup_from(&[("PRECINCT_BODY_LIMIT_BYTES", "0")])).is_err());
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let config = ApiConfig::from_lookup(lookup_from(&[(
            "PRECINCT_CORS_ORIGINS",
            " https://precinct.example , ,https://ops.precinct.example",
        )]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://precinct.example", "https://ops.precinct.example"]
        );
        assert!(config.has_strict_cors());
    }

    #[test]
    fn test_bind_addr() {
        let config = ApiConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 4000,
            ..Default::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:4000");

        let config = ApiConfig {
            bind_host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.bind_addr(),
            Err(ConfigError::InvalidBindAddress { .. })
        ));
    }
}
