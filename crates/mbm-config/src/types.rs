//! Configuration types.

use std::time::Duration;

use mbm_types::{ConfigProvider, HasSessionCacheConfig, TtlUnit, config_defaults};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbmConfig {
    /// Session token cache configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
}

impl MbmConfig {
    /// Create an empty configuration (every section at its defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another layer on top of this one. Sections present in `other`
    /// replace the corresponding sections here.
    pub fn merge(&mut self, other: MbmConfig) {
        if other.session.is_some() {
            self.session = other.session;
        }
    }

    /// Effective session configuration.
    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Reject values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.session().validate()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session token cache configuration.
///
/// ```toml
/// [session]
/// ttl = 30
/// ttl_unit = "minutes"
/// max_entries = 100000
/// sweep = true
/// sweep_interval_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sliding TTL amount, in `ttl_unit`.
    pub ttl: u64,
    /// Unit for `ttl`.
    pub ttl_unit: TtlUnit,
    /// Maximum number of cached tokens (unbounded when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    /// Whether to run the background sweeper.
    pub sweep: bool,
    /// Interval in seconds between sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: config_defaults::TTL,
            ttl_unit: config_defaults::TTL_UNIT,
            max_entries: None,
            sweep: true,
            sweep_interval_secs: config_defaults::SWEEP_INTERVAL_SECS,
        }
    }
}

impl SessionConfig {
    /// The TTL as a duration.
    pub fn ttl_duration(&self) -> Duration {
        self.ttl_unit.to_duration(self.ttl)
    }

    /// Reject values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ttl == 0 {
            return Err(invalid("session.ttl", "must be greater than zero"));
        }
        if self.max_entries == Some(0) {
            return Err(invalid(
                "session.max_entries",
                "must be greater than zero (omit it for no limit)",
            ));
        }
        if self.sweep && self.sweep_interval_secs == 0 {
            return Err(invalid(
                "session.sweep_interval_secs",
                "must be greater than zero when sweeping is enabled",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl ConfigProvider for SessionConfig {}

impl HasSessionCacheConfig for SessionConfig {
    fn ttl(&self) -> Duration {
        self.ttl_duration()
    }

    fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    fn sweep_interval(&self) -> Option<Duration> {
        self.sweep
            .then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MbmConfig::from_toml("").unwrap();
        assert!(config.session.is_none());

        let session = config.session();
        assert_eq!(session.ttl_duration(), Duration::from_secs(30 * 60));
        assert_eq!(session.sweep_interval(), Some(Duration::from_secs(60)));
        assert_eq!(session.max_entries(), None);
    }

    #[test]
    fn test_parse_session_section() {
        let config = MbmConfig::from_toml(
            r#"
[session]
ttl = 100
ttl_unit = "milliseconds"
max_entries = 5000
sweep = false
"#,
        )
        .unwrap();

        let session = config.session();
        assert_eq!(session.ttl(), Duration::from_millis(100));
        assert_eq!(session.max_entries(), Some(5000));
        assert_eq!(session.sweep_interval(), None);
        assert_eq!(session.sweep_interval_secs, config_defaults::SWEEP_INTERVAL_SECS);
    }

    #[test]
    fn test_unknown_unit_is_a_parse_error() {
        let err = MbmConfig::from_toml("[session]\nttl_unit = \"fortnights\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_replaces_present_sections() {
        let mut base = MbmConfig::from_toml("[session]\nttl = 10\n").unwrap();
        base.merge(MbmConfig::new());
        assert_eq!(base.session().ttl, 10);

        base.merge(MbmConfig::from_toml("[session]\nttl = 20\n").unwrap());
        assert_eq!(base.session().ttl, 20);
    }

    #[test]
    fn test_validate() {
        assert!(MbmConfig::new().validate().is_ok());

        let zero_ttl = MbmConfig::from_toml("[session]\nttl = 0\n").unwrap();
        assert!(matches!(
            zero_ttl.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "session.ttl"
        ));

        let zero_cap = MbmConfig::from_toml("[session]\nmax_entries = 0\n").unwrap();
        assert!(zero_cap.validate().is_err());

        let zero_interval = MbmConfig::from_toml("[session]\nsweep_interval_secs = 0\n").unwrap();
        assert!(zero_interval.validate().is_err());

        let lazy_only =
            MbmConfig::from_toml("[session]\nsweep = false\nsweep_interval_secs = 0\n").unwrap();
        assert!(lazy_only.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_keeps_unit_names() {
        let config = MbmConfig {
            session: Some(SessionConfig {
                ttl: 2,
                ttl_unit: TtlUnit::Hours,
                ..Default::default()
            }),
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("ttl_unit = \"hours\""));
        assert!(!toml_str.contains("max_entries"));
        assert_eq!(MbmConfig::from_toml(&toml_str).unwrap(), config);
    }
}
