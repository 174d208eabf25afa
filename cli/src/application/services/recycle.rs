//! Application service — recycle every instance of an application, one at a time.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use chrono::Utc;

use crate::application::ports::{PlatformGateway, ProgressReporter, RolloutLock};
use crate::application::services::instance_poller::{PollSettings, restart_and_wait};
use crate::domain::app::matching_name;
use crate::domain::rollout::{SkippedInstance, decide};
use crate::domain::{
    AppState, InstanceDecision, RecycleError, RecycleFailure, RecycleReport, RolloutContext,
    SkipReason,
};

/// Resolve `app_name`, validate it, then restart its instances sequentially.
///
/// Nothing is restarted unless exactly one application has the name, it is
/// `STARTED`, and the rollout lock is free. Instance `n + 1` is not touched
/// until instance `n` is observed fresh. There is no rollback: the first
/// failure ends the rollout and reports which indices were already recycled.
///
/// # Errors
///
/// Returns a [`RecycleFailure`] wrapping the first [`RecycleError`] hit.
pub async fn recycle_application<G, L, R>(
    gateway: &G,
    lock: &L,
    reporter: &R,
    app_name: &str,
    settings: PollSettings,
) -> Result<RecycleReport, RecycleFailure>
where
    G: PlatformGateway,
    L: RolloutLock,
    R: ProgressReporter,
{
    let start_time = Utc::now();
    let started = tokio::time::Instant::now();

    // Step 1: resolve by exact name.
    let apps = gateway.list_applications().await.map_err(|source| {
        RecycleFailure::untouched(RecycleError::StatusUnavailable {
            name: app_name.to_string(),
            source,
        })
    })?;
    let application = match matching_name(&apps, app_name).as_slice() {
        [] => {
            return Err(RecycleFailure::untouched(RecycleError::ApplicationNotFound {
                name: app_name.to_string(),
            }));
        }
        [only] => (*only).clone(),
        many => {
            return Err(RecycleFailure::untouched(
                RecycleError::AmbiguousApplication {
                    name: app_name.to_string(),
                    count: many.len(),
                },
            ));
        }
    };

    // Step 2: validate.
    if application.state != AppState::Started {
        return Err(RecycleFailure::untouched(
            RecycleError::ApplicationNotRunning {
                name: application.name,
                state: application.state,
            },
        ));
    }

    // Step 3: exclude concurrent rollouts of the same application.
    let _guard = match lock.try_acquire(&application.guid) {
        Ok(Some(guard)) => guard,
        Ok(None) => {
            return Err(RecycleFailure::untouched(RecycleError::RolloutInProgress {
                name: application.name,
            }));
        }
        Err(source) => {
            return Err(RecycleFailure::untouched(RecycleError::LockUnavailable {
                name: application.name,
                source,
            }));
        }
    };

    // Step 4: snapshot.
    let snapshot = gateway
        .get_application_detail(&application.guid)
        .await
        .map_err(|source| {
            RecycleFailure::untouched(RecycleError::StatusUnavailable {
                name: application.name.clone(),
                source,
            })
        })?;
    let ctx = RolloutContext {
        application,
        start_time,
        snapshot,
    };
    let name = ctx.application.name.as_str();
    tracing::info!(app = %name, guid = %ctx.application.guid, instances = ctx.instance_count(), %start_time, "rollout started");

    // Step 5: visit every index in ascending order.
    let mut recycled = Vec::new();
    let mut skipped = Vec::new();
    for index in 0..ctx.instance_count() {
        let refreshed;
        let detail = if index == 0 {
            &ctx.snapshot
        } else {
            refreshed = match gateway.get_application_detail(&ctx.application.guid).await {
                Ok(detail) => detail,
                Err(source) => {
                    return Err(RecycleFailure {
                        error: RecycleError::StatusUnavailable {
                            name: name.to_string(),
                            source,
                        },
                        recycled,
                    });
                }
            };
            &refreshed
        };

        let Some(instance) = detail.instance(index) else {
            return Err(RecycleFailure {
                error: RecycleError::InstanceOutOfRange {
                    name: name.to_string(),
                    index,
                    count: detail.instances.len(),
                },
                recycled,
            });
        };

        match decide(instance, start_time) {
            InstanceDecision::Restart => {
                if let Err(error) = restart_and_wait(gateway, reporter, &ctx, index, settings).await
                {
                    return Err(RecycleFailure { error, recycled });
                }
                reporter.success(&format!("{name} instance {index} recycled"));
                recycled.push(index);
            }
            InstanceDecision::Skip(reason) => {
                tracing::debug!(app = %name, index, %reason, "skipping instance");
                let msg = format!("Skipping {name} instance: {index} ({reason})");
                match reason {
                    SkipReason::NotRunning => reporter.warn(&msg),
                    SkipReason::AlreadyFresh => reporter.step(&msg),
                }
                skipped.push(SkippedInstance { index, reason });
            }
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(app = %name, recycled = recycled.len(), skipped = skipped.len(), elapsed_secs = elapsed.as_secs(), "rollout complete");
    Ok(RecycleReport {
        application: name.to_string(),
        start_time,
        recycled,
        skipped,
        elapsed,
    })
}
