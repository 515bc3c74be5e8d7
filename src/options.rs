use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Environment variable holding the attempt bound.
pub const MAX_RETRIES_ENV: &str = "FRASERPAY_MAX_RETRIES";
/// Environment variable holding the inter-attempt delay in milliseconds.
pub const RETRY_DELAY_MS_ENV: &str = "FRASERPAY_RETRY_DELAY_MS";

/// Configures how often and how patiently an operation is retried.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Total number of attempts, including the first one.
    pub max_retries: u32,
    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl RetryOptions {
    /// Delay slept between two consecutive attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Attempt bound actually used by the executor. Never below one.
    pub fn attempt_limit(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Checks that the options describe at least one attempt.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        Ok(())
    }

    /// Reads options from environment variables.
    ///
    /// Reads:
    /// - `FRASERPAY_MAX_RETRIES` — total attempts (default `3`)
    /// - `FRASERPAY_RETRY_DELAY_MS` — delay between attempts (default `1000`)
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// **Not available on `wasm32` targets** — browser runtimes have no
    /// process environment; deserialize [`RetryOptions`] from app config
    /// instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = read_var(&lookup, MAX_RETRIES_ENV)? {
            options.max_retries = value;
        }
        if let Some(value) = read_var(&lookup, RETRY_DELAY_MS_ENV)? {
            options.retry_delay_ms = value;
        }
        options.validate()?;
        Ok(options)
    }
}

fn read_var<L, T>(lookup: &L, var: &'static str) -> Result<Option<T>>
where
    L: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}
