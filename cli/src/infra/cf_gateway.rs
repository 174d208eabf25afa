//! Infrastructure implementation of the `PlatformGateway` port.
//!
//! `CfCliGateway<R>` reuses the operator's authenticated `cf` CLI session and
//! talks to the Cloud Controller v2 API through `cf curl`, routing every call
//! through a `CommandRunner` so tests can inject canned responses. Listings
//! are limited to one space when the gateway is scoped with `in_space`.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, PlatformGateway};
use crate::domain::{AppDetail, AppState, AppSummary, Instance, InstanceState};

const PAGE_SIZE: &str = "results-per-page=100";

/// Platform gateway backed by the `cf` executable.
pub struct CfCliGateway<R: CommandRunner> {
    runner: R,
    binary: String,
    space_guid: Option<String>,
}

impl<R: CommandRunner> CfCliGateway<R> {
    /// Create a gateway invoking `binary` through `runner`.
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            space_guid: None,
        }
    }

    /// List only the applications of the space `guid`.
    #[must_use]
    pub fn in_space(mut self, guid: impl Into<String>) -> Self {
        self.space_guid = Some(guid.into());
        self
    }

    fn apps_path(&self) -> String {
        match &self.space_guid {
            Some(space) => format!("/v2/spaces/{space}/apps?{PAGE_SIZE}"),
            None => format!("/v2/apps?{PAGE_SIZE}"),
        }
    }

    /// Run `cf curl [-X method] path` and decode the JSON body.
    ///
    /// `cf curl` exits 0 on API errors, so an `error_code` in the body is
    /// treated as failure. An empty body yields `None`.
    async fn curl(&self, method: Option<&str>, path: &str) -> Result<Option<serde_json::Value>> {
        let mut args = vec!["curl"];
        if let Some(method) = method {
            args.extend(["-X", method]);
        }
        args.push(path);

        let output = self
            .runner
            .run(&self.binary, &args)
            .await
            .with_context(|| format!("{} curl {path}", self.binary))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            anyhow::bail!("{} curl {path} failed: {}", self.binary, detail.trim());
        }

        let body = String::from_utf8_lossy(&output.stdout);
        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value =
            serde_json::from_str(body).with_context(|| format!("invalid JSON from {path}"))?;
        if let Some(err) = api_error(&value) {
            anyhow::bail!("{path}: {err}");
        }
        Ok(Some(value))
    }

    async fn curl_json(&self, path: &str) -> Result<serde_json::Value> {
        self.curl(None, path)
            .await?
            .with_context(|| format!("empty response from {path}"))
    }
}

impl<R: CommandRunner> PlatformGateway for CfCliGateway<R> {
    async fn list_applications(&self) -> Result<Vec<AppSummary>> {
        let mut apps = Vec::new();
        let mut path = self.apps_path();
        loop {
            let page: AppsPage = serde_json::from_value(self.curl_json(&path).await?)
                .context("parsing application list")?;
            apps.extend(page.resources.into_iter().map(AppResource::into_summary));
            match page.next_url {
                Some(next) if !next.is_empty() => path = next,
                _ => break,
            }
        }
        tracing::debug!(count = apps.len(), space = ?self.space_guid, "listed applications");
        Ok(apps)
    }

    async fn get_application_detail(&self, guid: &str) -> Result<AppDetail> {
        let app = self.curl_json(&format!("/v2/apps/{guid}")).await?;
        let app: AppResource = serde_json::from_value(app).context("parsing application")?;
        let instances = self
            .curl_json(&format!("/v2/apps/{guid}/instances"))
            .await?;
        let instances = parse_instances(instances)?;
        let summary = app.into_summary();
        Ok(AppDetail {
            name: summary.name,
            guid: summary.guid,
            state: summary.state,
            instances,
        })
    }

    async fn restart_instance(&self, guid: &str, index: usize) -> Result<()> {
        self.curl(Some("DELETE"), &format!("/v2/apps/{guid}/instances/{index}"))
            .await?;
        Ok(())
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AppsPage {
    #[serde(default)]
    next_url: Option<String>,
    #[serde(default)]
    resources: Vec<AppResource>,
}

#[derive(Debug, Deserialize)]
struct AppResource {
    metadata: ResourceMetadata,
    entity: AppEntity,
}

#[derive(Debug, Deserialize)]
struct ResourceMetadata {
    guid: String,
}

#[derive(Debug, Deserialize)]
struct AppEntity {
    name: String,
    #[serde(default)]
    state: String,
}

impl AppResource {
    fn into_summary(self) -> AppSummary {
        AppSummary {
            name: self.entity.name,
            guid: self.metadata.guid,
            state: AppState::from_platform(&self.entity.state),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstanceEntry {
    state: String,
    #[serde(default)]
    since: Option<f64>,
}

/// `description (error_code)` when the body is a Cloud Controller error.
fn api_error(value: &serde_json::Value) -> Option<String> {
    let code = value.get("error_code")?.as_str()?;
    let description = value
        .get("description")
        .and_then(|d| d.as_str())
        .unwrap_or("request failed");
    Some(format!("{description} ({code})"))
}

/// Decode `{"0": {"state": "RUNNING", "since": 1403140717.98}, ...}`.
fn parse_instances(value: serde_json::Value) -> Result<Vec<Instance>> {
    let raw: BTreeMap<String, InstanceEntry> =
        serde_json::from_value(value).context("parsing instance list")?;
    let mut instances = raw
        .into_iter()
        .map(|(key, entry)| -> Result<Instance> {
            let index = key
                .parse::<usize>()
                .with_context(|| format!("invalid instance index '{key}'"))?;
            Ok(Instance {
                index,
                state: InstanceState::from_platform(&entry.state),
                since: entry.since.and_then(epoch_to_utc),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    instances.sort_by_key(|i| i.index);
    Ok(instances)
}

/// Fractional epoch seconds to UTC. Non-finite or out-of-range input yields `None`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
