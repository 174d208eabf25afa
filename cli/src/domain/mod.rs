//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod config;
pub mod error;
pub mod metadata;
pub mod rollout;

pub use app::{AppDetail, AppState, AppSummary, Instance, InstanceState};
pub use config::{RecycleConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, RecycleError, RecycleFailure};
pub use metadata::{BuildInfo, PluginMetadata};
pub use rollout::{InstanceDecision, InstanceObservation, RecycleReport, RolloutContext, SkipReason};
