//! Configuration management for Splunk dispatch tooling.
//!
//! This crate provides types and loaders for managing Splunk connection,
//! namespace and polling configuration from environment variables and
//! `.env` files.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{AuthConfig, Config, ConnectionConfig, NamespaceConfig, PollingConfig};
