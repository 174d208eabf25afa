//! Domain types and validators for cf-recycle configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "poll.interval",
    "poll.timeout",
    "cf.binary",
    "cf.command_timeout",
];

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;
const DEFAULT_CF_COMMAND_TIMEOUT_SECS: u64 = 60;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.cf-recycle/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RecycleConfig {
    /// Instance health polling.
    pub poll: PollConfig,
    /// Cloud Foundry CLI invocation.
    pub cf: CfConfig,
}

/// Polling behaviour while waiting for a restarted instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between two status queries.
    pub interval: u64,
    /// Maximum seconds to wait for one instance. `0` waits forever.
    pub timeout: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL_SECS,
            timeout: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

impl PollConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Per-instance wait bound, or `None` for the unbounded wait.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// Settings for the `cf` executable used as the platform gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CfConfig {
    /// Executable name or path.
    pub binary: String,
    /// Seconds before a single `cf` invocation is killed.
    pub command_timeout: u64,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            binary: "cf".to_string(),
            command_timeout: DEFAULT_CF_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl RecycleConfig {
    /// Every setting as `(key, value)`, in `VALID_CONFIG_KEYS` order.
    #[must_use]
    pub fn settings(&self) -> [(&'static str, String); 4] {
        [
            ("poll.interval", self.poll.interval.to_string()),
            ("poll.timeout", self.poll.timeout.to_string()),
            ("cf.binary", self.cf.binary.clone()),
            ("cf.command_timeout", self.cf.command_timeout.to_string()),
        ]
    }

    /// Apply the same checks as `config set` to every loaded value.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.settings() {
            validate_config_value(key, &value)?;
        }
        Ok(())
    }
}

impl CfConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };
    match key {
        "poll.interval" | "cf.command_timeout" => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid("Expected a positive number of seconds.")),
        },
        "poll.timeout" => value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| invalid("Expected a number of seconds (0 waits forever).")),
        "cf.binary" if value.trim().is_empty() => Err(invalid("Expected a program name or path.")),
        _ => Ok(()),
    }
}

/// Apply a validated `key = value` pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn apply_setting(config: &mut RecycleConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "poll.interval" => config.poll.interval = value.parse()?,
        "poll.timeout" => config.poll.timeout = value.parse()?,
        "cf.binary" => config.cf.binary = value.to_string(),
        "cf.command_timeout" => config.cf.command_timeout = value.parse()?,
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
