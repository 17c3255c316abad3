//! Resolver configuration
//!
//! Environment variables:
//! - `SCOPE_CACHE_TTL` - Resolution cache TTL in seconds (default: 30)
//! - `SCOPE_LOOKUP_TIMEOUT_MS` - Upper bound on a single attribute lookup (default: none)
//! - `SCOPE_CACHE_CLEANUP_INTERVAL` - Expired entry sweep interval in seconds (default: 60)

use crate::error::{AccessControlError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cache TTL (30 seconds)
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Default janitor interval (60 seconds)
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Scope resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Time-to-live for resolved attribute scopes
    pub cache_ttl_secs: u64,

    /// Optional bound on each attribute resolver call, in milliseconds
    pub lookup_timeout_ms: Option<u64>,

    /// How often expired cache entries are swept
    pub cleanup_interval_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            lookup_timeout_ms: None,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Unset variables keep their defaults; unparsable ones are rejected.
    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ttl) = parse_var(&get, "SCOPE_CACHE_TTL")? {
            config.cache_ttl_secs = ttl;
        }
        if let Some(timeout) = parse_var(&get, "SCOPE_LOOKUP_TIMEOUT_MS")? {
            config.lookup_timeout_ms = Some(timeout);
        }
        if let Some(interval) = parse_var(&get, "SCOPE_CACHE_CLEANUP_INTERVAL")? {
            config.cleanup_interval_secs = interval;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the resolver cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs == 0 {
            return Err(AccessControlError::Configuration(
                "cache_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.lookup_timeout_ms == Some(0) {
            return Err(AccessControlError::Configuration(
                "lookup_timeout_ms must be greater than zero when set".to_string(),
            ));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(AccessControlError::Configuration(
                "cleanup_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Cache TTL as a duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Lookup timeout as a duration, if configured
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    /// Janitor interval as a duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

fn parse_var<F>(get: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
            AccessControlError::Configuration(format!("{} must be an integer, got {:?}: {}", key, raw, e))
        }),
    }
}
