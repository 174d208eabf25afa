//! The space targeted by the operator's `cf` CLI session.
//!
//! `cf target` records the current org and space in
//! `$CF_HOME/.cf/config.json`, where `CF_HOME` defaults to the home directory.
//! Application names are only unique within a space, so name lookups are
//! scoped to this space when one is targeted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding the directory that holds `.cf/config.json`.
pub const CF_HOME_ENV: &str = "CF_HOME";

/// A space selected with `cf target -s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpace {
    pub guid: String,
    pub name: String,
}

/// Location of the `cf` CLI configuration file.
///
/// # Errors
///
/// Returns an error if neither `CF_HOME` nor the home directory is available.
pub fn cf_config_path() -> Result<PathBuf> {
    let home = match std::env::var_os(CF_HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir().context("cannot determine home directory")?,
    };
    Ok(home.join(".cf").join("config.json"))
}

/// The space targeted by the current `cf` session, if any.
///
/// # Errors
///
/// Returns an error if the `cf` configuration exists but cannot be read.
pub fn targeted_space() -> Result<Option<TargetSpace>> {
    read_target_space(&cf_config_path()?)
}

/// Read the targeted space from a `cf` configuration file.
///
/// A missing file or an empty `SpaceFields.GUID` yields `None`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_target_space(path: &Path) -> Result<Option<TargetSpace>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let config: CfCliConfig = serde_json::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    Ok(config
        .space_fields
        .filter(|space| !space.guid.is_empty())
        .map(|space| TargetSpace {
            guid: space.guid,
            name: space.name,
        }))
}

#[derive(Debug, Deserialize)]
struct CfCliConfig {
    #[serde(rename = "SpaceFields", default)]
    space_fields: Option<SpaceFields>,
}

#[derive(Debug, Deserialize)]
struct SpaceFields {
    #[serde(rename = "GUID", default)]
    guid: String,
    #[serde(rename = "Name", default)]
    name: String,
}
