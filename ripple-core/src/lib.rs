//! Ripple core library: run configuration, shared domain types, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes shared across the workspace
//! - [`error`]: [`ConfigError`]
//! - [`config`]: [`SyncConfig`] and its loader

pub mod config;
pub mod error;
pub mod types;

pub use config::{SyncConfig, CONFIG_FILE};
pub use error::ConfigError;
pub use types::ProjectName;
