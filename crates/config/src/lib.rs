//! Configuration management for the reminder agent
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (REMINDER_AGENT_ prefix, `__` separator)
//! - A YAML service-center directory
//!
//! Every tunable of the dialogue state machine lives in [`DialoguePolicy`].

pub mod constants;
pub mod dialogue;
pub mod service_centers;
pub mod settings;

pub use dialogue::{DialoguePolicy, RejectInDatePolicy};
pub use service_centers::ServiceCentersConfig;
pub use settings::{
    load_settings, ObservabilityConfig, PersistenceConfig, ServerConfig, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
