//! `cf-recycle recycle <APP>` — restart every instance, one at a time.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{PlatformGateway, ProgressReporter, RolloutLock};
use crate::application::services::instance_poller::PollSettings;
use crate::application::services::recycle::recycle_application;
use crate::domain::{RecycleConfig, RecycleFailure, RecycleReport};
use crate::infra::cf_gateway::CfCliGateway;
use crate::infra::cf_target::targeted_space;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::lock::FileRolloutLock;
use crate::output::{SilentReporter, TerminalReporter};

/// Exit code used when the rollout is interrupted with Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

/// Arguments for the recycle command.
#[derive(Args, Debug)]
pub struct RecycleArgs {
    /// Name of the application to recycle (exact, case-sensitive)
    #[arg(value_name = "APP_NAME")]
    pub app: String,

    /// Seconds between instance status checks [default: from config, 5]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Max seconds to wait for each instance; 0 waits forever [default: from config, 600]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl RecycleArgs {
    /// Merge command-line overrides over the configured poll settings.
    #[must_use]
    pub fn poll_settings(&self, config: &RecycleConfig) -> PollSettings {
        PollSettings {
            interval: self
                .poll_interval
                .map_or_else(|| config.poll.interval(), Duration::from_secs),
            timeout: match self.timeout {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => config.poll.timeout(),
            },
        }
    }
}

/// Run `cf-recycle recycle`.
///
/// # Errors
///
/// Returns an error if configuration or the `cf` target cannot be read, or
/// the rollout fails.
pub async fn run(app: &AppContext, args: &RecycleArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let settings = args.poll_settings(&config);

    if !args.yes
        && !app.confirm(
            &format!("Restart every instance of '{}' one at a time?", args.app),
            true,
        )?
    {
        app.output.info("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    let gateway = CfCliGateway::new(
        TokioCommandRunner::new(config.cf.command_timeout()),
        config.cf.binary.clone(),
    );
    let gateway = match targeted_space()? {
        Some(space) => {
            tracing::debug!(space = %space.name, guid = %space.guid, "resolving name in targeted space");
            gateway.in_space(space.guid)
        }
        None => {
            tracing::warn!("no cf space targeted; resolving the name across every visible space");
            gateway
        }
    };
    let lock = FileRolloutLock::new(app.lock_dir()?);

    let outcome = if app.is_json() {
        recycle_until_interrupted(&gateway, &lock, &SilentReporter, &args.app, settings).await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        recycle_until_interrupted(&gateway, &lock, &reporter, &args.app, settings).await
    };

    match outcome {
        Some(Ok(report)) => {
            app.renderer().render_report(&report)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Err(failure)) => Err(failure.into()),
        None => {
            app.output.error(&format!(
                "Interrupted. '{}' may be partially recycled; run the command again to finish.",
                args.app
            ));
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}

/// Drive the rollout, or return `None` if Ctrl-C arrives first. Dropping the
/// rollout future releases the rollout lock.
async fn recycle_until_interrupted(
    gateway: &impl PlatformGateway,
    lock: &impl RolloutLock,
    reporter: &impl ProgressReporter,
    app_name: &str,
    settings: PollSettings,
) -> Option<Result<RecycleReport, RecycleFailure>> {
    tokio::select! {
        outcome = recycle_application(gateway, lock, reporter, app_name, settings) => Some(outcome),
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(app = app_name, "rollout interrupted");
            None
        }
    }
}
