//! Command implementations

pub mod config;
pub mod recycle;
pub mod version;
