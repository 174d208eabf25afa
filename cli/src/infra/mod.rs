//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the `cf`
//! CLI gateway and its targeted space, configuration files, and rollout lock files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cf_gateway;
pub mod cf_target;
pub mod command_runner;
pub mod config;
pub mod lock;
