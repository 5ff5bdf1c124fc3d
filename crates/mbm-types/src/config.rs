//! Configuration traits for decoupled config passing between crates.
//!
//! The session cache depends on these capabilities rather than on the full
//! file-backed configuration structure in `mbm-config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base trait for all configuration types.
///
/// Implementations should be cheaply cloneable and thread-safe.
pub trait ConfigProvider: Clone + Send + Sync + 'static {}

/// Session-token cache configuration.
pub trait HasSessionCacheConfig: ConfigProvider {
    /// Sliding time-to-live: how long an entry survives without being read.
    fn ttl(&self) -> Duration;

    /// Optional bound on the number of cached tokens (None = unbounded).
    fn max_entries(&self) -> Option<usize> {
        None
    }

    /// Interval between background sweeps (None = lazy eviction only).
    fn sweep_interval(&self) -> Option<Duration> {
        Some(defaults::sweep_interval())
    }
}

/// Unit a TTL amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TtlUnit {
    /// Convert `amount` of this unit into a [`Duration`], saturating on overflow.
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TtlUnit::Nanoseconds => Duration::from_nanos(amount),
            TtlUnit::Microseconds => Duration::from_micros(amount),
            TtlUnit::Milliseconds => Duration::from_millis(amount),
            TtlUnit::Seconds => Duration::from_secs(amount),
            TtlUnit::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            TtlUnit::Hours => Duration::from_secs(amount.saturating_mul(3_600)),
            TtlUnit::Days => Duration::from_secs(amount.saturating_mul(86_400)),
        }
    }
}

impl std::fmt::Display for TtlUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TtlUnit::Nanoseconds => "nanoseconds",
            TtlUnit::Microseconds => "microseconds",
            TtlUnit::Milliseconds => "milliseconds",
            TtlUnit::Seconds => "seconds",
            TtlUnit::Minutes => "minutes",
            TtlUnit::Hours => "hours",
            TtlUnit::Days => "days",
        };
        f.write_str(name)
    }
}

/// Default session cache configuration values.
pub mod defaults {
    use std::time::Duration;

    use super::TtlUnit;

    pub const TTL: u64 = 30;
    pub const TTL_UNIT: TtlUnit = TtlUnit::Minutes;
    pub const SWEEP_INTERVAL_SECS: u64 = 60;

    pub fn ttl() -> Duration {
        TTL_UNIT.to_duration(TTL)
    }

    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECS)
    }
}

/// Standalone session cache configuration.
#[derive(Debug, Clone)]
pub struct SessionCacheConfigProvider {
    pub ttl: Duration,
    pub max_entries: Option<usize>,
    pub sweep_interval: Option<Duration>,
}

impl Default for SessionCacheConfigProvider {
    fn default() -> Self {
        Self {
            ttl: defaults::ttl(),
            max_entries: None,
            sweep_interval: Some(defaults::sweep_interval()),
        }
    }
}

impl ConfigProvider for SessionCacheConfigProvider {}

impl HasSessionCacheConfig for SessionCacheConfigProvider {
    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval
    }
}
