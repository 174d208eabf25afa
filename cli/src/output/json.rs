//! JSON output helpers.
//!
//! `JsonRenderer` prints one pretty-printed document per command. Errors use
//! the shared error object produced by [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{ConfigError, PluginMetadata, RecycleConfig, RecycleFailure, RecycleReport};

/// Renders domain types as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_report(&self, report: &RecycleReport) -> Result<()> {
        print_json(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_metadata(&self, metadata: &PluginMetadata) -> Result<()> {
        print_json(metadata)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &RecycleConfig, path: &Path) -> Result<()> {
        let obj = serde_json::json!({
            "config": config,
            "path": path.display().to_string(),
        });
        print_json(&obj)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_setting(&self, key: &str, value: &str) -> Result<()> {
        print_json(&serde_json::json!({ "key": key, "value": value }))
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// When `recycled` is non-empty it is included so callers can tell which
/// instances were already restarted.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str, recycled: &[usize]) -> Result<String> {
    let mut obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    if !recycled.is_empty() {
        obj["recycled"] = serde_json::json!(recycled);
    }
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format any command error as the JSON error object.
///
/// Rollout failures keep their own code and recycled indices. Configuration
/// errors use `config_error`; anything else is `command_failed`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_command_error(err: &anyhow::Error) -> Result<String> {
    if let Some(failure) = err.downcast_ref::<RecycleFailure>() {
        return format_error(
            &failure.error.to_string(),
            failure.error.code(),
            &failure.recycled,
        );
    }
    let code = if err.downcast_ref::<ConfigError>().is_some() {
        "config_error"
    } else {
        "command_failed"
    };
    format_error(&err.to_string(), code, &[])
}
