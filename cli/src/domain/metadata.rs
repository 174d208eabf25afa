//! Plugin metadata, built from explicit build inputs.

use serde::Serialize;

pub const PLUGIN_NAME: &str = "cf-recycle-plugin";
pub const RECYCLE_COMMAND: &str = "recycle";
pub const RECYCLE_HELP_TEXT: &str = "Recycle CF Application Instances";

/// Build-time inputs the metadata is derived from.
#[derive(Debug, Clone)]
pub struct BuildInfo<'a> {
    /// Package version string, e.g. `"1.0.0"`.
    pub version: &'a str,
}

/// `major.minor.build` triple advertised to the host CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VersionType {
    pub major: u64,
    pub minor: u64,
    pub build: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandMetadata {
    pub name: &'static str,
    pub help_text: &'static str,
    pub usage: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub name: &'static str,
    pub version: VersionType,
    pub commands: Vec<CommandMetadata>,
}

impl PluginMetadata {
    /// An unparseable version string yields `0.0.0` rather than failing startup.
    #[must_use]
    pub fn new(build: &BuildInfo<'_>) -> Self {
        let version = semver::Version::parse(build.version)
            .map(|v| VersionType {
                major: v.major,
                minor: v.minor,
                build: v.patch,
            })
            .unwrap_or_default();
        Self {
            name: PLUGIN_NAME,
            version,
            commands: vec![CommandMetadata {
                name: RECYCLE_COMMAND,
                help_text: RECYCLE_HELP_TEXT,
                usage: "cf-recycle recycle APP_NAME",
            }],
        }
    }

    /// `"<name> <major>.<minor>.<build>"`.
    #[must_use]
    pub fn display_version(&self) -> String {
        let VersionType {
            major,
            minor,
            build,
        } = self.version;
        format!("{} {major}.{minor}.{build}", self.name)
    }
}
