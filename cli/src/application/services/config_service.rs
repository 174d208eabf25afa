//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{RecycleConfig, apply_setting};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the configuration file exists but is unreadable.
pub fn load_config(store: &impl ConfigStore) -> Result<RecycleConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be written.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<RecycleConfig> {
    let mut config = store.load()?;
    apply_setting(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
