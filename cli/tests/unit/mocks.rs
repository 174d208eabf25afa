//! Shared mock infrastructure for unit tests.
//!
//! Provides a scripted [`PlatformGateway`], a recording [`ProgressReporter`],
//! an in-memory [`RolloutLock`], and a canned [`CommandRunner`] so each test
//! file doesn't have to re-define the same boilerplate.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use cf_recycle::application::ports::{
    CommandRunner, PlatformGateway, ProgressReporter, RolloutLock,
};
use cf_recycle::domain::{AppDetail, AppState, AppSummary, Instance, InstanceState};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Domain builders ──────────────────────────────────────────────────────────

pub const APP_NAME: &str = "myApp";
pub const APP_GUID: &str = "guid-1";

pub fn summary(name: &str, guid: &str, state: AppState) -> AppSummary {
    AppSummary {
        name: name.to_string(),
        guid: guid.to_string(),
        state,
    }
}

pub fn instance(index: usize, state: InstanceState, since: Option<DateTime<Utc>>) -> Instance {
    Instance {
        index,
        state,
        since,
    }
}

/// A `RUNNING` instance that started an hour ago.
pub fn stale(index: usize) -> Instance {
    instance(
        index,
        InstanceState::Running,
        Some(Utc::now() - chrono::Duration::hours(1)),
    )
}

pub fn detail(instances: Vec<Instance>) -> AppDetail {
    AppDetail {
        name: APP_NAME.to_string(),
        guid: APP_GUID.to_string(),
        state: AppState::Started,
        instances,
    }
}

// ── Mock: scripted platform ──────────────────────────────────────────────────

/// What a status query returns for one instance after its restart.
#[derive(Debug, Clone, Copy)]
pub enum Poll {
    /// The query itself fails.
    Fail,
    /// The instance is not listed.
    Missing,
    /// The instance is reported with this state; `since` is "now".
    State(InstanceState),
    /// The instance is `RUNNING` but `since` predates the rollout.
    StaleRunning,
}

/// In-memory platform that serves a fixed application list, a per-index
/// script of poll results, and records every call.
///
/// Detail queries between restarts (snapshot, re-fetch) return the current
/// baseline, which is updated to "fresh" for each recycled index.
pub struct FakePlatform {
    apps: Vec<AppSummary>,
    list_fails: bool,
    baseline: Mutex<Vec<Instance>>,
    refetch_override: Mutex<VecDeque<Result<Vec<Instance>, String>>>,
    polls: Mutex<Vec<VecDeque<Poll>>>,
    restart_failures: Mutex<Vec<usize>>,
    /// Index currently being waited on, set by `restart_instance`.
    waiting: Mutex<Option<usize>>,
    pub restarts: Mutex<Vec<usize>>,
    pub detail_calls: Mutex<u32>,
    pub list_calls: Mutex<u32>,
    /// Set if a restart is issued while another index is still waiting.
    pub overlapped: Mutex<bool>,
}

impl FakePlatform {
    /// One `STARTED` app named [`APP_NAME`] with the given instances.
    pub fn with_instances(instances: Vec<Instance>) -> Self {
        Self::new(
            vec![summary(APP_NAME, APP_GUID, AppState::Started)],
            instances,
        )
    }

    pub fn new(apps: Vec<AppSummary>, instances: Vec<Instance>) -> Self {
        let polls = instances
            .iter()
            .map(|_| VecDeque::from([Poll::State(InstanceState::Running)]))
            .collect();
        Self {
            apps,
            list_fails: false,
            baseline: Mutex::new(instances),
            refetch_override: Mutex::new(VecDeque::new()),
            polls: Mutex::new(polls),
            restart_failures: Mutex::new(Vec::new()),
            waiting: Mutex::new(None),
            restarts: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(0),
            list_calls: Mutex::new(0),
            overlapped: Mutex::new(false),
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// Replace the poll script for `index`. The last entry repeats forever.
    pub fn script(self, index: usize, script: &[Poll]) -> Self {
        self.polls.lock().expect("lock")[index] = script.iter().copied().collect();
        self
    }

    /// Make the restart request for `index` fail.
    pub fn reject_restart(self, index: usize) -> Self {
        self.restart_failures.lock().expect("lock").push(index);
        self
    }

    /// Queue the result of the next non-poll detail query (snapshot or re-fetch).
    pub fn next_refetch(self, result: Result<Vec<Instance>, String>) -> Self {
        self.refetch_override.lock().expect("lock").push_back(result);
        self
    }

    pub fn restart_log(&self) -> Vec<usize> {
        self.restarts.lock().expect("lock").clone()
    }

    pub fn detail_count(&self) -> u32 {
        *self.detail_calls.lock().expect("lock")
    }

    pub fn list_count(&self) -> u32 {
        *self.list_calls.lock().expect("lock")
    }

    pub fn did_overlap(&self) -> bool {
        *self.overlapped.lock().expect("lock")
    }

    fn poll(&self, index: usize) -> Result<AppDetail> {
        let step = {
            let mut polls = self.polls.lock().expect("lock");
            let script = &mut polls[index];
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            }
        };
        let step = step.unwrap_or(Poll::State(InstanceState::Running));
        let mut instances = self.baseline.lock().expect("lock").clone();
        let current = match step {
            Poll::Fail => anyhow::bail!("connection reset"),
            Poll::Missing => {
                instances.retain(|i| i.index != index);
                return Ok(detail(instances));
            }
            Poll::State(state) => instance(index, state, Some(Utc::now())),
            Poll::StaleRunning => stale(index),
        };
        if let Some(slot) = instances.iter_mut().find(|i| i.index == index) {
            *slot = current.clone();
        }
        if matches!(step, Poll::State(InstanceState::Running)) {
            *self.waiting.lock().expect("lock") = None;
            let mut baseline = self.baseline.lock().expect("lock");
            if let Some(slot) = baseline.iter_mut().find(|i| i.index == index) {
                *slot = current;
            }
        }
        Ok(detail(instances))
    }
}

impl PlatformGateway for FakePlatform {
    async fn list_applications(&self) -> Result<Vec<AppSummary>> {
        *self.list_calls.lock().expect("lock") += 1;
        if self.list_fails {
            anyhow::bail!("not logged in");
        }
        Ok(self.apps.clone())
    }

    async fn get_application_detail(&self, guid: &str) -> Result<AppDetail> {
        *self.detail_calls.lock().expect("lock") += 1;
        assert_eq!(guid, APP_GUID, "queried the wrong application");
        let waiting = *self.waiting.lock().expect("lock");
        if let Some(index) = waiting {
            return self.poll(index);
        }
        let queued = self.refetch_override.lock().expect("lock").pop_front();
        match queued {
            Some(Ok(instances)) => Ok(detail(instances)),
            Some(Err(msg)) => anyhow::bail!(msg),
            None => Ok(detail(self.baseline.lock().expect("lock").clone())),
        }
    }

    async fn restart_instance(&self, guid: &str, index: usize) -> Result<()> {
        assert_eq!(guid, APP_GUID, "restarted the wrong application");
        if self.waiting.lock().expect("lock").is_some() {
            *self.overlapped.lock().expect("lock") = true;
        }
        self.restarts.lock().expect("lock").push(index);
        if self.restart_failures.lock().expect("lock").contains(&index) {
            anyhow::bail!("CF-InstancesError");
        }
        *self.waiting.lock().expect("lock") = Some(index);
        Ok(())
    }
}

// ── Mock: recording progress reporter ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.lock().expect("lock").push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.lock().expect("lock").push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.lock().expect("lock").push(format!("warn: {message}"));
    }
}

// ── Mock: in-memory rollout lock ─────────────────────────────────────────────

/// Keys held inside this process. Clones share the same set.
#[derive(Clone, Default)]
pub struct MemoryLock {
    held: Arc<Mutex<HashSet<String>>>,
}

impl MemoryLock {
    pub fn is_held(&self, key: &str) -> bool {
        self.held.lock().expect("lock").contains(key)
    }
}

/// Releases the key when dropped.
pub struct MemoryGuard {
    key: String,
    held: Arc<Mutex<HashSet<String>>>,
}

impl Drop for MemoryGuard {
    fn drop(&mut self) {
        self.held.lock().expect("lock").remove(&self.key);
    }
}

impl RolloutLock for MemoryLock {
    type Guard = MemoryGuard;

    fn try_acquire(&self, key: &str) -> Result<Option<MemoryGuard>> {
        let mut held = self.held.lock().expect("lock");
        if !held.insert(key.to_string()) {
            return Ok(None);
        }
        Ok(Some(MemoryGuard {
            key: key.to_string(),
            held: Arc::clone(&self.held),
        }))
    }
}

// ── Mock: canned command runner ──────────────────────────────────────────────

pub type CallLog = Arc<Mutex<Vec<Vec<String>>>>;

/// Returns queued outputs in order and records every invocation.
pub struct CannedRunner {
    outputs: Mutex<VecDeque<Output>>,
    calls: CallLog,
}

impl CannedRunner {
    pub fn new(outputs: Vec<Output>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Arc::default(),
        }
    }

    /// Shared handle to the invocation log, usable after the runner is moved.
    pub fn call_log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }
}

impl CommandRunner for CannedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| (*a).to_string()));
        self.calls.lock().expect("lock").push(call);
        self.outputs
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected command: {program} {args:?}"))
    }
}
