//! Configuration management for the onboarding agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/` (`default`, then `{env}`)
//! - Environment variables (`ONBOARDING__` prefix, `__` separator)
//!
//! Every section has serde defaults, so an empty or missing config directory
//! yields a valid `Settings`.

pub mod settings;

pub use settings::{
    load_settings, load_settings_from, DetectorConfig, ObservabilityConfig, SessionConfig,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
