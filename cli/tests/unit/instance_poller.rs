//! Tests for `restart_and_wait`, driven directly with a hand-built context.

#![allow(clippy::expect_used)]

use std::time::Duration;

use chrono::Utc;
use cf_recycle::application::services::instance_poller::{PollSettings, restart_and_wait};
use cf_recycle::domain::{AppState, InstanceState, RecycleError, RolloutContext};

use crate::mocks::{
    APP_GUID, APP_NAME, FakePlatform, Poll, RecordingReporter, detail, stale, summary,
};

fn context(instances: usize) -> RolloutContext {
    RolloutContext {
        application: summary(APP_NAME, APP_GUID, AppState::Started),
        start_time: Utc::now(),
        snapshot: detail((0..instances).map(stale).collect()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_sleeps_before_first_query() {
    let platform = FakePlatform::with_instances(vec![stale(0)]);
    let ctx = context(1);
    let started = tokio::time::Instant::now();

    restart_and_wait(
        &platform,
        &RecordingReporter::default(),
        &ctx,
        0,
        PollSettings {
            interval: Duration::from_secs(7),
            timeout: Some(Duration::from_secs(60)),
        },
    )
    .await
    .expect("fresh on first poll");

    assert_eq!(platform.detail_count(), 1);
    assert_eq!(started.elapsed(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_stale_running_is_not_terminal() {
    let platform = FakePlatform::with_instances(vec![stale(0)]).script(
        0,
        &[
            Poll::StaleRunning,
            Poll::StaleRunning,
            Poll::State(InstanceState::Running),
        ],
    );
    let reporter = RecordingReporter::default();

    restart_and_wait(&platform, &reporter, &context(1), 0, PollSettings::default())
        .await
        .expect("eventually fresh");

    assert_eq!(platform.detail_count(), 3);
    let status_lines = reporter
        .lines()
        .iter()
        .filter(|l| l.contains("Instance 0 Status: RUNNING"))
        .count();
    assert_eq!(status_lines, 3);
}

#[tokio::test(start_paused = true)]
async fn test_reports_restart_and_status_lines() {
    let platform = FakePlatform::with_instances(vec![stale(0), stale(1)])
        .script(1, &[Poll::State(InstanceState::Starting), Poll::State(InstanceState::Running)]);
    let reporter = RecordingReporter::default();

    restart_and_wait(&platform, &reporter, &context(2), 1, PollSettings::default())
        .await
        .expect("fresh");

    let lines = reporter.lines();
    assert_eq!(lines[0], "step: Restarting myApp instance: 1");
    assert!(lines[1].starts_with("step: Instance 1 Status: STARTING Since: "));
    assert!(lines[2].starts_with("step: Instance 1 Status: RUNNING Since: "));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_restart_does_not_poll() {
    let platform = FakePlatform::with_instances(vec![stale(0)]).reject_restart(0);

    let err = restart_and_wait(
        &platform,
        &RecordingReporter::default(),
        &context(1),
        0,
        PollSettings::default(),
    )
    .await
    .expect_err("restart rejected");

    assert!(matches!(err, RecycleError::RestartFailed { index: 0, .. }));
    assert_eq!(platform.detail_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_times_out_when_queries_keep_failing() {
    let platform = FakePlatform::with_instances(vec![stale(0)]).script(0, &[Poll::Fail]);

    let err = restart_and_wait(
        &platform,
        &RecordingReporter::default(),
        &context(1),
        0,
        PollSettings {
            interval: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(30)),
        },
    )
    .await
    .expect_err("never fresh");

    assert_eq!(err.code(), "timeout");
    assert!(err.to_string().contains("30"), "got: {err}");
    assert!(platform.detail_count() >= 5);
}
