//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::app::AppState;

// ── Recycle errors ────────────────────────────────────────────────────────────

/// Errors that abort a recycle rollout.
#[derive(Debug, Error)]
pub enum RecycleError {
    #[error("Application '{name}' not found. Check the name with: cf apps")]
    ApplicationNotFound { name: String },

    #[error(
        "Application name '{name}' matches {count} applications in different spaces. Target the right space first: cf target -s <space>"
    )]
    AmbiguousApplication { name: String, count: usize },

    #[error("Application '{name}' is {state}, not STARTED. Start it first: cf start {name}")]
    ApplicationNotRunning { name: String, state: AppState },

    #[error("Cannot retrieve status of application '{name}': {source:#}")]
    StatusUnavailable {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to restart instance {index} of '{name}': {source:#}")]
    RestartFailed {
        name: String,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "Instance {index} of '{name}' did not become healthy within {}s",
        .waited.as_secs()
    )]
    Timeout {
        name: String,
        index: usize,
        waited: Duration,
    },

    #[error(
        "Instance {index} of '{name}' is no longer reported by the platform ({count} instances listed)"
    )]
    InstanceOutOfRange {
        name: String,
        index: usize,
        count: usize,
    },

    #[error("Another recycle of '{name}' is already in progress.")]
    RolloutInProgress { name: String },

    #[error("Cannot acquire rollout lock for '{name}': {source:#}")]
    LockUnavailable {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RecycleError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ApplicationNotFound { .. } => "app_not_found",
            Self::AmbiguousApplication { .. } => "app_ambiguous",
            Self::ApplicationNotRunning { .. } => "app_not_running",
            Self::StatusUnavailable { .. } => "status_unavailable",
            Self::RestartFailed { .. } => "restart_failed",
            Self::Timeout { .. } => "timeout",
            Self::InstanceOutOfRange { .. } => "instance_out_of_range",
            Self::RolloutInProgress { .. } => "rollout_in_progress",
            Self::LockUnavailable { .. } => "lock_unavailable",
        }
    }
}

/// A failed rollout together with what it had already achieved.
#[derive(Debug, Error)]
#[error("{error}{}", recycled_suffix(.recycled))]
pub struct RecycleFailure {
    #[source]
    pub error: RecycleError,
    /// Indices restarted and confirmed fresh before the failure.
    pub recycled: Vec<usize>,
}

impl RecycleFailure {
    /// Failure before any instance was touched.
    #[must_use]
    pub fn untouched(error: RecycleError) -> Self {
        Self {
            error,
            recycled: Vec::new(),
        }
    }
}

fn recycled_suffix(recycled: &[usize]) -> String {
    if recycled.is_empty() {
        return String::new();
    }
    let list = recycled
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("\n\nInstances already recycled: {list}")
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },
}

// ── Unit tests ────────────────────────────────────────────────────────────────
