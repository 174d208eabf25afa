//! Application service — restart one instance and wait for its replacement.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use chrono::SecondsFormat;

use crate::application::ports::{PlatformGateway, ProgressReporter};
use crate::domain::{Instance, InstanceObservation, RecycleError, RolloutContext};

/// Poll cadence and bound for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause before every status query.
    pub interval: Duration,
    /// Give up after this long. `None` polls until the instance is fresh.
    pub timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Restart instance `index` and block until it is `RUNNING` with
/// `since >= start_time`.
///
/// A failed restart request is fatal. A failed status query is inconclusive
/// and retried after the same interval.
///
/// # Errors
///
/// Returns `RestartFailed` if the platform rejects the restart, or `Timeout`
/// if the instance is not fresh within `settings.timeout`.
pub async fn restart_and_wait(
    gateway: &impl PlatformGateway,
    reporter: &impl ProgressReporter,
    ctx: &RolloutContext,
    index: usize,
    settings: PollSettings,
) -> Result<(), RecycleError> {
    let app = &ctx.application;

    reporter.step(&format!("Restarting {} instance: {index}", app.name));
    tracing::info!(app = %app.name, guid = %app.guid, index, "restarting instance");
    gateway
        .restart_instance(&app.guid, index)
        .await
        .map_err(|source| RecycleError::RestartFailed {
            name: app.name.clone(),
            index,
            source,
        })?;

    let wait = wait_until_fresh(gateway, reporter, ctx, index, settings.interval);
    let polls = match settings.timeout {
        Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
            tracing::warn!(app = %app.name, index, waited_secs = limit.as_secs(), "instance wait timed out");
            RecycleError::Timeout {
                name: app.name.clone(),
                index,
                waited: limit,
            }
        })?,
        None => wait.await,
    };

    tracing::info!(app = %app.name, index, polls, "instance fresh and running");
    Ok(())
}

/// Poll until the instance is observed fresh. Returns the number of queries made.
async fn wait_until_fresh(
    gateway: &impl PlatformGateway,
    reporter: &impl ProgressReporter,
    ctx: &RolloutContext,
    index: usize,
    interval: Duration,
) -> u32 {
    let app = &ctx.application;
    let mut polls = 0u32;
    loop {
        tokio::time::sleep(interval).await;
        polls += 1;

        let instance = match gateway.get_application_detail(&app.guid).await {
            Ok(detail) => detail.instance(index).cloned(),
            Err(e) => {
                tracing::warn!(app = %app.name, index, error = %format!("{e:#}"), "status poll failed, retrying");
                None
            }
        };
        if let Some(instance) = &instance {
            reporter.step(&status_line(instance));
        }

        let observed = InstanceObservation::observe(instance.as_ref(), ctx.start_time);
        tracing::debug!(app = %app.name, index, polls, ?observed, "polled instance");
        if observed.is_terminal() {
            return polls;
        }
    }
}

/// `Instance <index> Status: <state> Since: <timestamp>`.
#[must_use]
pub fn status_line(instance: &Instance) -> String {
    let since = instance.since.map_or_else(
        || "-".to_string(),
        |s| s.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    format!(
        "Instance {} Status: {} Since: {since}",
        instance.index, instance.state
    )
}
