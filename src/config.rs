//! Configuration Module
//!
//! Loads cache and batching durations from environment variables.

use std::env;
use std::time::Duration;

/// Default cache entry lifetime in milliseconds (5 minutes)
pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = 300_000;

/// Default batch window in milliseconds
pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 50;

/// Timing parameters for a cache and a coalescer.
///
/// Durations cannot be negative. A zero `cache_timeout` makes every entry stale
/// on its first read; a zero `batch_interval` flushes on the next timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long a cache entry stays live after it is written
    pub cache_timeout: Duration,
    /// How long a batch accumulates after its first operation
    pub batch_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TIMEOUT_MS` - Cache entry lifetime in milliseconds (default: 300000)
    /// - `BATCH_INTERVAL_MS` - Batch window in milliseconds (default: 50)
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            cache_timeout: Duration::from_millis(env_millis(
                "CACHE_TIMEOUT_MS",
                DEFAULT_CACHE_TIMEOUT_MS,
            )),
            batch_interval: Duration::from_millis(env_millis(
                "BATCH_INTERVAL_MS",
                DEFAULT_BATCH_INTERVAL_MS,
            )),
        }
    }
}

fn env_millis(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_timeout: Duration::from_millis(DEFAULT_CACHE_TIMEOUT_MS),
            batch_interval: Duration::from_millis(DEFAULT_BATCH_INTERVAL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_timeout, Duration::from_secs(300));
        assert_eq!(config.batch_interval, Duration::from_millis(50));
    }

    // Single test touching the environment so parallel tests cannot race on it
    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_TIMEOUT_MS");
        env::remove_var("BATCH_INTERVAL_MS");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("CACHE_TIMEOUT_MS", "1500");
        env::set_var("BATCH_INTERVAL_MS", "-5");
        let config = Config::from_env();
        assert_eq!(config.cache_timeout, Duration::from_millis(1500));
        assert_eq!(config.batch_interval, Duration::from_millis(50));

        env::remove_var("CACHE_TIMEOUT_MS");
        env::remove_var("BATCH_INTERVAL_MS");
    }
}
