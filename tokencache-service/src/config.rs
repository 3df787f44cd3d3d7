//! Token cache configuration.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tokencache_core::constants::{
    DEFAULT_MAX_ENTRIES, DEFAULT_SWEEP_INTERVAL_SECONDS, DEFAULT_TOKEN_TTL_SECONDS,
    ENV_MAX_ENTRIES, ENV_SWEEP_INTERVAL_SECONDS, ENV_TTL_SECONDS,
};
use tokencache_core::error::{Result, TokenCacheError};

/// Token cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheConfig {
    /// Lifetime of a cached token in seconds
    pub ttl_seconds: u64,
    /// Background sweep interval in seconds (0 = no sweeper)
    pub sweep_interval_seconds: u64,
    /// Maximum number of cached tokens (0 = unbounded)
    pub max_entries: usize,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl TokenCacheConfig {
    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// Unset variables fall back to the defaults.
    ///
    /// # Errors
    /// Returns [`TokenCacheError::ConfigError`] for unparsable values or a
    /// zero TTL.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            ttl_seconds: parse_var(&lookup, ENV_TTL_SECONDS, defaults.ttl_seconds)?,
            sweep_interval_seconds: parse_var(
                &lookup,
                ENV_SWEEP_INTERVAL_SECONDS,
                defaults.sweep_interval_seconds,
            )?,
            max_entries: parse_var(&lookup, ENV_MAX_ENTRIES, defaults.max_entries)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the cache cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_seconds == 0 {
            return Err(TokenCacheError::ConfigError(
                "token TTL must be at least one second".into(),
            ));
        }
        Ok(())
    }

    /// Sets the token TTL in seconds.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Sets the sweep interval in seconds.
    pub fn with_sweep_interval_seconds(mut self, seconds: u64) -> Self {
        self.sweep_interval_seconds = seconds;
        self
    }

    /// Sets the capacity bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Disables the background sweeper.
    pub fn no_sweep(mut self) -> Self {
        self.sweep_interval_seconds = 0;
        self
    }

    /// Token TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Sweep interval, or `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_seconds > 0).then(|| Duration::from_secs(self.sweep_interval_seconds))
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            TokenCacheError::ConfigError(format!("{}='{}': {}", name, raw, e))
        }),
    }
}
