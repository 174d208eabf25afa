//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;

use anyhow::Result;

use crate::domain::{AppDetail, AppSummary, RecycleConfig};

// ── Platform Gateway Port ─────────────────────────────────────────────────────

/// Synchronous request/response access to the cloud platform.
///
/// Implementations hold an already-authenticated session. None of the calls
/// wait for instance health.
#[allow(async_fn_in_trait)]
pub trait PlatformGateway {
    /// List the applications the caller can act on, in the targeted space when
    /// the implementation is scoped to one.
    async fn list_applications(&self) -> Result<Vec<AppSummary>>;
    /// Fetch the application's current detail, including per-instance state.
    async fn get_application_detail(&self, guid: &str) -> Result<AppDetail>;
    /// Ask the platform to restart instance `index`. Returns once the request
    /// is accepted, not once the replacement is healthy.
    async fn restart_instance(&self, guid: &str, index: usize) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed (not
    /// left orphaned).
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Rollout Lock Port ─────────────────────────────────────────────────────────

/// Mutual exclusion between rollouts of the same application.
///
/// The returned guard holds the lock until it is dropped.
pub trait RolloutLock {
    type Guard;

    /// Try to take the lock for `key` without waiting.
    ///
    /// Returns `Ok(None)` when another holder already has it.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock state cannot be read or written.
    fn try_acquire(&self, key: &str) -> Result<Option<Self::Guard>>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<RecycleConfig>;
    /// Persist configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &RecycleConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
