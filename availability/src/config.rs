//! Configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `AVAILABILITY_SWEEP_INTERVAL_MS` | `1000` |
//! | `AVAILABILITY_PRINCIPAL` | `anonymous` |
//! | `AVAILABILITY_LOG_LEVEL` | `info` |
//! | `AVAILABILITY_EVENT_BUFFER` | `1024` |

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// What would have been accepted
        expected: &'static str,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Delay between overdue sweeps
    pub sweep_interval: Duration,
    /// Principal used for requests that name none
    pub default_principal: String,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Capacity of the published-event channel
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(1000),
            default_principal: "anonymous".to_string(),
            log_level: "info".to_string(),
            event_buffer: 1024,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse or
    /// the sweep interval is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let sweep_interval_ms: u64 = parse_or(
            &lookup,
            "AVAILABILITY_SWEEP_INTERVAL_MS",
            "a positive number of milliseconds",
            1000,
        )?;
        if sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "AVAILABILITY_SWEEP_INTERVAL_MS",
                value: "0".to_string(),
                expected: "a positive number of milliseconds",
            });
        }

        Ok(Self {
            sweep_interval: Duration::from_millis(sweep_interval_ms),
            default_principal: lookup("AVAILABILITY_PRINCIPAL")
                .unwrap_or(defaults.default_principal),
            log_level: lookup("AVAILABILITY_LOG_LEVEL").unwrap_or(defaults.log_level),
            event_buffer: parse_or(
                &lookup,
                "AVAILABILITY_EVENT_BUFFER",
                "a channel capacity",
                defaults.event_buffer,
            )?,
        })
    }

    /// The `tracing` filter directive for this crate at the configured level.
    #[must_use]
    pub fn log_filter(&self) -> String {
        format!("asset_availability={}", self.log_level)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name,
                value,
                expected,
            }),
    }
}
