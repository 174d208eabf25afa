//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::{PluginMetadata, RecycleConfig, RecycleReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the summary of a completed rollout.
    pub fn render_report(&self, report: &RecycleReport) {
        let recycled = report.recycled.len();
        let noun = if recycled == 1 { "instance" } else { "instances" };
        self.ctx.success(&format!(
            "{} recycled: {recycled} {noun} in {}",
            report.application,
            format_elapsed(report.elapsed.as_secs()),
        ));
        if self.ctx.quiet {
            return;
        }
        for skipped in &report.skipped {
            println!(
                "  {} instance {} skipped ({})",
                "-".style(self.ctx.styles.skip(skipped.reason)),
                skipped.index,
                skipped.reason
            );
        }
    }

    /// Render plugin name, version, and commands.
    pub fn render_metadata(&self, metadata: &PluginMetadata) {
        if self.ctx.quiet {
            return;
        }
        println!("{}", metadata.display_version());
        for command in &metadata.commands {
            self.ctx.kv(command.name, command.help_text);
        }
    }

    /// Confirm a `config set`.
    pub fn render_setting(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render configuration values and the file they come from.
    pub fn render_config(&self, config: &RecycleConfig, path: &Path) {
        self.ctx.header("Configuration");
        self.ctx.kv("poll.interval:     ", &format!("{}s", config.poll.interval));
        let timeout = if config.poll.timeout == 0 {
            "none".to_string()
        } else {
            format!("{}s", config.poll.timeout)
        };
        self.ctx.kv("poll.timeout:      ", &timeout);
        self.ctx.kv("cf.binary:         ", &config.cf.binary);
        self.ctx
            .kv("cf.command_timeout:", &format!("{}s", config.cf.command_timeout));
        self.ctx.kv("file:              ", &path.display().to_string());
    }
}

/// Format seconds as `"Xm Ys"`, or `"Ys"` under a minute.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
