//! Resource pool configuration.
//!
//! # Responsibility
//! - Hold the owning-tier cache switches consumed by the pool.
//! - Translate the configured lifetime into an effective TTL.
//!
//! # Invariants
//! - An enabled, non-zero lifetime is used as configured.
//! - Disabling the cache or configuring a zero lifetime maps to the floor, so
//!   identical lookups inside one burst of requests are still served locally.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default owning-tier lifetime: five minutes.
pub const DEFAULT_CACHE_LIFETIME_MS: u64 = 300_000;
/// Lifetime used when caching is disabled or configured as zero.
pub const DISABLED_CACHE_FLOOR_MS: u64 = 10_000;
/// Interval between automatic sweeps of the owning tier.
pub const EXPIRATION_SCAN_INTERVAL_MS: u64 = 60_000;
/// Sweep interval while caching is disabled.
pub const DISABLED_EXPIRATION_SCAN_INTERVAL_MS: u64 = 15_000;

/// Owning-tier cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    /// Global switch for the owning cache tier.
    pub caching_enabled: bool,
    /// Owning-tier lifetime in milliseconds. `0` means disabled.
    pub cache_lifetime_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            caching_enabled: true,
            cache_lifetime_ms: DEFAULT_CACHE_LIFETIME_MS,
        }
    }
}

impl PoolConfig {
    /// Configuration with the owning tier switched off.
    pub fn disabled() -> Self {
        Self {
            caching_enabled: false,
            ..Self::default()
        }
    }

    /// Returns a copy with a different lifetime.
    pub fn with_lifetime_ms(mut self, cache_lifetime_ms: u64) -> Self {
        self.cache_lifetime_ms = cache_lifetime_ms;
        self
    }

    /// Parses configuration from a JSON object. Missing keys keep defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Lifetime applied to entries inserted into the owning tier.
    pub fn effective_ttl_ms(&self) -> u64 {
        if !self.caching_enabled || self.cache_lifetime_ms == 0 {
            return DISABLED_CACHE_FLOOR_MS;
        }
        self.cache_lifetime_ms
    }

    /// How often the pool sweeps expired owning-tier entries on its own.
    pub fn scan_interval_ms(&self) -> u64 {
        if self.caching_enabled {
            EXPIRATION_SCAN_INTERVAL_MS
        } else {
            DISABLED_EXPIRATION_SCAN_INTERVAL_MS
        }
    }

    pub fn effective_ttl(&self) -> Duration {
        Duration::from_millis(self.effective_ttl_ms())
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid pool configuration: {message}"),
        }
    }
}

impl Error for ConfigError {}
