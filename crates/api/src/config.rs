//! Server configuration loaded from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;
/// Default hard limit for one simulation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of memoized outcomes.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;
/// Default number of paths returned on the wire.
pub const DEFAULT_RESPONSE_PATHS: usize = 10;
/// Default browser origin allowed by CORS.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {var}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Hard limit for one simulation.
    pub timeout: Duration,
    /// Maximum memoized outcomes; 0 disables the cache.
    pub cache_capacity: usize,
    /// Annual risk-free rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Maximum number of paths serialized into a response.
    pub response_path_limit: usize,
    /// Origin allowed by CORS.
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            risk_free_rate: 0.0,
            response_path_limit: DEFAULT_RESPONSE_PATHS,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads `.env` if present, then reads the `QUANTA_*` and `FRONTEND_URL`
    /// variables. Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns an error if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// Returns an error if a present variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: parse_var(&lookup, "QUANTA_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "QUANTA_PORT")?.unwrap_or(defaults.port),
            timeout: parse_var(&lookup, "QUANTA_TIMEOUT_SECS")?
                .map_or(defaults.timeout, Duration::from_secs),
            cache_capacity: parse_var(&lookup, "QUANTA_CACHE_CAPACITY")?
                .unwrap_or(defaults.cache_capacity),
            risk_free_rate: parse_var(&lookup, "QUANTA_RISK_FREE_RATE")?
                .unwrap_or(defaults.risk_free_rate),
            response_path_limit: parse_var(&lookup, "QUANTA_RESPONSE_PATHS")?
                .unwrap_or(defaults.response_path_limit),
            frontend_url: lookup("FRONTEND_URL").unwrap_or(defaults.frontend_url),
        })
    }

    /// Socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr().port(), 5000);
    }

    #[test]
    fn test_reads_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("QUANTA_HOST", "127.0.0.1"),
            ("QUANTA_PORT", "8080"),
            ("QUANTA_TIMEOUT_SECS", "5"),
            ("QUANTA_CACHE_CAPACITY", "0"),
            ("QUANTA_RISK_FREE_RATE", "0.04"),
            ("QUANTA_RESPONSE_PATHS", "25"),
            ("FRONTEND_URL", "https://app.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_capacity, 0);
        assert_eq!(config.risk_free_rate, 0.04);
        assert_eq!(config.response_path_limit, 25);
        assert_eq!(config.frontend_url, "https://app.example.com");
    }

    #[test]
    fn test_rejects_garbage() {
        let err = ServerConfig::from_lookup(lookup(&[("QUANTA_PORT", "eighty")])).unwrap_err();
        assert_eq!(err.var, "QUANTA_PORT");
    }
}
