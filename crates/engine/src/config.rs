use std::time::Duration;

use dve_core::analysis::DEFAULT_IMPROVEMENT_THRESHOLD;
use dve_core::versioning::{DEFAULT_LIST_LIMIT, DEFAULT_MAX_CREATE_ATTEMPTS};

/// Default bound on a single call to an external collaborator.
pub const DEFAULT_EXTERNAL_TIMEOUT_SECS: u64 = 8;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Without an
/// analyzer URL, versions are created with no attached analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the Quality/Impact Analyzer (default: unset).
    pub analyzer_url: Option<String>,
    /// Bound on each analyzer call in seconds (default: `8`).
    pub analyzer_timeout_secs: u64,
    /// Bound on each similarity estimation in seconds (default: `8`).
    pub similarity_timeout_secs: u64,
    /// Insert attempts before a version-number race is reported (default: `3`).
    pub max_create_attempts: u32,
    /// Quality score above which a new version becomes active (default: `0.8`).
    pub improvement_threshold: f64,
    /// Page size for version listings (default: `20`).
    pub default_list_limit: i64,
}

/// Raised when an environment variable is present but malformed.
#[derive(Debug, thiserror::Error)]
#[error("{var} has an invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer_url: None,
            analyzer_timeout_secs: DEFAULT_EXTERNAL_TIMEOUT_SECS,
            similarity_timeout_secs: DEFAULT_EXTERNAL_TIMEOUT_SECS,
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
            improvement_threshold: DEFAULT_IMPROVEMENT_THRESHOLD,
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `DVE_ANALYZER_URL`            | unset   |
    /// | `DVE_ANALYZER_TIMEOUT_SECS`   | `8`     |
    /// | `DVE_SIMILARITY_TIMEOUT_SECS` | `8`     |
    /// | `DVE_MAX_CREATE_ATTEMPTS`     | `3`     |
    /// | `DVE_IMPROVEMENT_THRESHOLD`   | `0.8`   |
    /// | `DVE_DEFAULT_LIST_LIMIT`      | `20`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let analyzer_url = lookup("DVE_ANALYZER_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let config = Self {
            analyzer_url,
            analyzer_timeout_secs: parse_or(
                &lookup,
                "DVE_ANALYZER_TIMEOUT_SECS",
                defaults.analyzer_timeout_secs,
            )?,
            similarity_timeout_secs: parse_or(
                &lookup,
                "DVE_SIMILARITY_TIMEOUT_SECS",
                defaults.similarity_timeout_secs,
            )?,
            max_create_attempts: parse_or(
                &lookup,
                "DVE_MAX_CREATE_ATTEMPTS",
                defaults.max_create_attempts,
            )?,
            improvement_threshold: parse_or(
                &lookup,
                "DVE_IMPROVEMENT_THRESHOLD",
                defaults.improvement_threshold,
            )?,
            default_list_limit: parse_or(
                &lookup,
                "DVE_DEFAULT_LIST_LIMIT",
                defaults.default_list_limit,
            )?,
        };

        if config.max_create_attempts == 0 {
            return Err(ConfigError {
                var: "DVE_MAX_CREATE_ATTEMPTS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&config.improvement_threshold) {
            return Err(ConfigError {
                var: "DVE_IMPROVEMENT_THRESHOLD",
                value: config.improvement_threshold.to_string(),
                reason: "must be within [0, 1]".into(),
            });
        }
        if config.default_list_limit < 1 {
            return Err(ConfigError {
                var: "DVE_DEFAULT_LIST_LIMIT",
                value: config.default_list_limit.to_string(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(config)
    }

    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_secs)
    }

    pub fn similarity_timeout(&self) -> Duration {
        Duration::from_secs(self.similarity_timeout_secs)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
