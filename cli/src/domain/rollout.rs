//! Rollout context and per-instance decisions.
//!
//! Pure data and functions only — the orchestration loop lives in
//! `application::services::recycle`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::app::{AppDetail, AppSummary, Instance, InstanceState};

/// State owned by one recycle invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct RolloutContext {
    /// The resolved application.
    pub application: AppSummary,
    /// Captured once, before any restart is issued.
    pub start_time: DateTime<Utc>,
    /// Detail taken after validation; defines which indices are visited.
    pub snapshot: AppDetail,
}

impl RolloutContext {
    /// Number of instances the rollout will visit.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.snapshot.instances.len()
    }
}

/// What to do with one instance when the rollout reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceDecision {
    Restart,
    Skip(SkipReason),
}

/// Why an instance was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not `RUNNING`; restarting it would be meaningless.
    NotRunning,
    /// Already `RUNNING` with `since >= start_time`.
    AlreadyFresh,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning => f.write_str("not running"),
            Self::AlreadyFresh => f.write_str("already fresh"),
        }
    }
}

/// Decide whether `instance` must be restarted in a rollout started at `start_time`.
#[must_use]
pub fn decide(instance: &Instance, start_time: DateTime<Utc>) -> InstanceDecision {
    if instance.needs_restart(start_time) {
        InstanceDecision::Restart
    } else if instance.state == InstanceState::Running {
        InstanceDecision::Skip(SkipReason::AlreadyFresh)
    } else {
        InstanceDecision::Skip(SkipReason::NotRunning)
    }
}

/// Observational state of an instance during its wait. Derived each poll,
/// never stored. Only `FreshRunning` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceObservation {
    /// The poll was inconclusive (query failed or index missing).
    Unknown,
    StaleRunning,
    Starting,
    Stopping,
    Crashed,
    Down,
    FreshRunning,
}

impl InstanceObservation {
    /// Classify a polled instance relative to the rollout start.
    #[must_use]
    pub fn observe(instance: Option<&Instance>, start_time: DateTime<Utc>) -> Self {
        let Some(instance) = instance else {
            return Self::Unknown;
        };
        match instance.state {
            InstanceState::Running if instance.is_fresh(start_time) => Self::FreshRunning,
            InstanceState::Running => Self::StaleRunning,
            InstanceState::Starting => Self::Starting,
            InstanceState::Stopping => Self::Stopping,
            InstanceState::Crashed | InstanceState::Flapping => Self::Crashed,
            InstanceState::Down => Self::Down,
            InstanceState::Unknown => Self::Unknown,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::FreshRunning
    }
}

/// Instance left untouched by a rollout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInstance {
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of a successful rollout.
#[derive(Debug, Clone, Serialize)]
pub struct RecycleReport {
    pub application: String,
    pub start_time: DateTime<Utc>,
    /// Indices restarted and confirmed fresh, in order.
    pub recycled: Vec<usize>,
    pub skipped: Vec<SkippedInstance>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
