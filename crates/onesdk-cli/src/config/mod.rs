//! Application configuration module.
//!
//! Manages the TOML config file holding the API token and an optional
//! base URL override.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{ApiConfig, AppConfig};
