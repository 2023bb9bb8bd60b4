//! Latency profile and process configuration for the mock backend.

use std::time::Duration;

use thiserror::Error;

use crate::balance::DEFAULT_BALANCE;

/// Artificial delay applied by each endpoint before it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub login: Duration,
    pub logout: Duration,
    pub validate: Duration,
    pub contacts: Duration,
    pub profile: Duration,
    pub transfer: Duration,
    /// Paths and methods no endpoint answers.
    pub unrouted: Duration,
}

impl Latency {
    /// Delays close to what the real service shows on a phone network.
    pub fn realistic() -> Self {
        Self {
            login: Duration::from_millis(1500),
            logout: Duration::from_millis(500),
            validate: Duration::from_millis(500),
            contacts: Duration::from_millis(500),
            profile: Duration::from_millis(500),
            transfer: Duration::from_millis(800),
            unrouted: Duration::from_millis(500),
        }
    }

    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    pub fn uniform(delay: Duration) -> Self {
        Self {
            login: delay,
            logout: delay,
            validate: delay,
            contacts: delay,
            profile: delay,
            transfer: delay,
            unrouted: delay,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::realistic()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),

    #[error("invalid MOCK_LATENCY {0:?}, expected \"realistic\" or \"none\"")]
    InvalidLatency(String),

    #[error("invalid MOCK_BALANCE {0:?}")]
    InvalidBalance(String),
}

/// Settings for the `mock-server` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub latency: Latency,
    pub initial_balance: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            latency: Latency::realistic(),
            initial_balance: DEFAULT_BALANCE,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `MOCK_LATENCY` and `MOCK_BALANCE` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(latency) = lookup("MOCK_LATENCY") {
            config.latency = match latency.as_str() {
                "realistic" => Latency::realistic(),
                "none" => Latency::none(),
                _ => return Err(ConfigError::InvalidLatency(latency)),
            };
        }
        if let Some(balance) = lookup("MOCK_BALANCE") {
            config.initial_balance = balance
                .parse::<f64>()
                .ok()
                .filter(|b| b.is_finite())
                .ok_or(ConfigError::InvalidBalance(balance))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.latency.login, Duration::from_millis(1500));
    }

    #[test]
    fn reads_all_settings() {
        let config =
            ServerConfig::from_lookup(lookup(&[("PORT", "8080"), ("MOCK_LATENCY", "none"), ("MOCK_BALANCE", "99.5")]))
                .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.latency, Latency::none());
        assert_eq!(config.initial_balance, 99.5);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("MOCK_LATENCY", "slow")])),
            Err(ConfigError::InvalidLatency(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("MOCK_BALANCE", "NaN")])),
            Err(ConfigError::InvalidBalance(_))
        ));
    }
}
