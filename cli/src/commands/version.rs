//! `cf-recycle version` — show plugin metadata.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::domain::{BuildInfo, PluginMetadata};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let metadata = PluginMetadata::new(&BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
    });
    app.renderer().render_metadata(&metadata)?;
    Ok(ExitCode::SUCCESS)
}
