//! Application and instance domain types.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Application ───────────────────────────────────────────────────────────────

/// Top-level application state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    Started,
    Stopped,
    /// Any state string the platform reports that is not listed above.
    #[serde(other)]
    Unknown,
}

impl AppState {
    /// Parse a platform state string (`"STARTED"`, `"STOPPED"`, ...).
    #[must_use]
    pub fn from_platform(value: &str) -> Self {
        match value {
            "STARTED" => Self::Started,
            "STOPPED" => Self::Stopped,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Started => "STARTED",
            Self::Stopped => "STOPPED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One entry of the application listing visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    /// User-facing application name.
    pub name: String,
    /// Platform-assigned identifier, stable for the application's lifetime.
    pub guid: String,
    /// Top-level state.
    pub state: AppState,
}

/// Detailed application state including per-instance data.
///
/// A snapshot: only valid at the moment it was retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetail {
    pub name: String,
    pub guid: String,
    pub state: AppState,
    /// Instances ordered by index, `instances[i].index == i`.
    pub instances: Vec<Instance>,
}

impl AppDetail {
    /// Look up the instance at `index`, if the platform still reports it.
    #[must_use]
    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.instances.iter().find(|i| i.index == index)
    }
}

/// Every application named exactly `name` (case-sensitive).
///
/// Names are only unique within a space, so a listing that spans spaces can
/// hold more than one match.
#[must_use]
pub fn matching_name<'a>(apps: &'a [AppSummary], name: &str) -> Vec<&'a AppSummary> {
    apps.iter().filter(|a| a.name == name).collect()
}

// ── Instance ──────────────────────────────────────────────────────────────────

/// Instance lifecycle state. Only `Running` is considered healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    Running,
    Starting,
    Stopping,
    Crashed,
    Down,
    Flapping,
    #[serde(other)]
    Unknown,
}

impl InstanceState {
    /// Parse a platform instance state string (`"RUNNING"`, `"STARTING"`, ...).
    #[must_use]
    pub fn from_platform(value: &str) -> Self {
        match value {
            "RUNNING" => Self::Running,
            "STARTING" => Self::Starting,
            "STOPPING" => Self::Stopping,
            "CRASHED" => Self::Crashed,
            "DOWN" => Self::Down,
            "FLAPPING" => Self::Flapping,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "RUNNING",
            Self::Starting => "STARTING",
            Self::Stopping => "STOPPING",
            Self::Crashed => "CRASHED",
            Self::Down => "DOWN",
            Self::Flapping => "FLAPPING",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A single application instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Position within the application's instance array. Not a stable identity.
    pub index: usize,
    pub state: InstanceState,
    /// When the instance entered its current state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

impl Instance {
    /// `RUNNING` and entered that state at or after `start_time`.
    #[must_use]
    pub fn is_fresh(&self, start_time: DateTime<Utc>) -> bool {
        self.state == InstanceState::Running && self.since.is_some_and(|s| s >= start_time)
    }

    /// `RUNNING` but not proven fresh; a missing `since` counts as stale.
    #[must_use]
    pub fn needs_restart(&self, start_time: DateTime<Utc>) -> bool {
        self.state == InstanceState::Running && !self.is_fresh(start_time)
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
