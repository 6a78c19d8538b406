//! Configuration Module
//!
//! Loads cache construction parameters from environment variables.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Default expiration in milliseconds (0 = never expire)
pub const DEFAULT_EXPIRATION_VAR: &str = "CACHE_DEFAULT_EXPIRATION_MS";
/// Sweep interval in milliseconds (0 = no sweeper)
pub const SWEEP_INTERVAL_VAR: &str = "CACHE_SWEEP_INTERVAL_MS";

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL applied to entries stored with the default expiration, None = never
    pub default_expiration: Option<Duration>,
    /// Interval between background sweeps, zero disables the sweeper
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Missing variables use the defaults. Unparsable ones are logged and
    /// also fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_EXPIRATION_MS` - Default TTL in ms, 0 = never (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in ms, 0 = off (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_expiration = match read_millis(DEFAULT_EXPIRATION_VAR) {
            Ok(Some(ms)) => non_zero(ms),
            Ok(None) => defaults.default_expiration,
            Err(err) => {
                warn!(%err, "Using default expiration");
                defaults.default_expiration
            }
        };

        let sweep_interval = match read_millis(SWEEP_INTERVAL_VAR) {
            Ok(Some(ms)) => Duration::from_millis(ms),
            Ok(None) => defaults.sweep_interval,
            Err(err) => {
                warn!(%err, "Using default sweep interval");
                defaults.sweep_interval
            }
        };

        Self {
            default_expiration,
            sweep_interval,
        }
    }

    /// Like [`Config::from_env`], but reports unparsable values.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] naming the offending variable.
    pub fn try_from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_expiration = match read_millis(DEFAULT_EXPIRATION_VAR)? {
            Some(ms) => non_zero(ms),
            None => defaults.default_expiration,
        };
        let sweep_interval = read_millis(SWEEP_INTERVAL_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.sweep_interval);

        Ok(Self {
            default_expiration,
            sweep_interval,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_expiration: Some(Duration::from_secs(300)),
            sweep_interval: Duration::from_secs(1),
        }
    }
}

/// Reads a millisecond count from `var`; Ok(None) if the variable is unset.
fn read_millis(var: &str) -> Result<Option<u64>> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig {
                var: var.to_string(),
                value: raw,
            }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(raw)) => Err(CacheError::InvalidConfig {
            var: var.to_string(),
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

fn non_zero(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
