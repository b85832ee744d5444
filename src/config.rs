//! Engine and server configuration, read from the environment.
//!
//! Unset or unparsable variables keep their defaults; a bad value is logged.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Seeded reorderings tried when forming groups.
pub const DEFAULT_ATTEMPTS: usize = 15;
/// Seats a category may request beyond its entrant count.
pub const DEFAULT_OVERFLOW_MARGIN: usize = 2;
/// Courts per time slot when the source gives none.
pub const DEFAULT_COURT_CAPACITY: u32 = 4;

/// Tunables of the group former and scheduler.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub attempts: usize,
    pub overflow_margin: usize,
    pub default_capacity: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            overflow_margin: DEFAULT_OVERFLOW_MARGIN,
            default_capacity: DEFAULT_COURT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SCHEDULER_ATTEMPTS`, `GROUP_OVERFLOW_MARGIN`
    /// and `DEFAULT_COURT_CAPACITY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            attempts: env_parse("SCHEDULER_ATTEMPTS", defaults.attempts),
            overflow_margin: env_parse("GROUP_OVERFLOW_MARGIN", defaults.overflow_margin),
            default_capacity: env_parse("DEFAULT_COURT_CAPACITY", defaults.default_capacity),
        }
    }
}

/// Bind address of the web binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `HOST` and `PORT`, falling back to 0.0.0.0:8080.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_default("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
        }
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Trimmed, non-empty value of `key`.
pub fn env_default(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    let Some(raw) = env_default(key) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Ignoring invalid {}={:?}, keeping default", key, raw);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.attempts, 15);
        assert_eq!(config.overflow_margin, 2);
        assert_eq!(config.default_capacity, 4);
    }

    #[test]
    fn invalid_value_keeps_default() {
        env::set_var("TENNIS_TEST_BAD_NUMBER", "many");
        assert_eq!(env_parse("TENNIS_TEST_BAD_NUMBER", 7usize), 7);
        env::set_var("TENNIS_TEST_GOOD_NUMBER", " 12 ");
        assert_eq!(env_parse("TENNIS_TEST_GOOD_NUMBER", 7usize), 12);
    }

    #[test]
    fn partial_engine_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"attempts": 3}"#).unwrap();
        assert_eq!(config.attempts, 3);
        assert_eq!(config.overflow_margin, DEFAULT_OVERFLOW_MARGIN);
    }
}
