//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, sessions};
use crate::{ConfigError, DialoguePolicy};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// State machine budgets and business rules
    #[serde(default)]
    pub dialogue: DialoguePolicy,

    /// Session store lifecycle
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Path to a service-center YAML directory; built-in directory if unset
    #[serde(default)]
    pub service_centers_path: Option<String>,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Call-record persistence (ScyllaDB)
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    endpoints::DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    endpoints::DEFAULT_PORT
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Age after which the sweep force-ends a session
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_ttl() -> u64 {
    sessions::TTL_SECONDS
}
fn default_sweep_interval() -> u64 {
    sessions::SWEEP_INTERVAL_SECONDS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder and expose /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec![endpoints::SCYLLA_DEFAULT.to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| endpoints::SCYLLA_KEYSPACE.to_string())
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dialogue.validate()?;
        self.validate_sessions()?;
        self.validate_server()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_sessions(&self) -> Result<(), ConfigError> {
        if self.sessions.sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.sweep_interval_seconds".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }
        if self.sessions.ttl_seconds < self.sessions.sweep_interval_seconds {
            return Err(ConfigError::InvalidValue {
                field: "sessions.ttl_seconds".to_string(),
                message: "must not be shorter than the sweep interval".to_string(),
            });
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "port 0 is not allowed".to_string(),
            });
        }
        if self.environment.is_production() && self.server.cors_enabled && self.server.cors_origins.is_empty() {
            tracing::warn!("CORS allows any origin in production; set server.cors_origins");
        }
        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if self.persistence.enabled {
            if self.persistence.scylla_hosts.is_empty() {
                return Err(ConfigError::MissingField("persistence.scylla_hosts".to_string()));
            }
            if self.persistence.replication_factor == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.replication_factor".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (REMINDER_AGENT_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("REMINDER_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.sessions.ttl_seconds, 900);
        assert_eq!(settings.dialogue.utc_offset_minutes, 330);
        assert!(settings.service_centers_path.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_ttl_shorter_than_sweep_is_invalid() {
        let mut settings = Settings::default();
        settings.sessions.ttl_seconds = 10;
        settings.sessions.sweep_interval_seconds = 30;
        assert!(settings.validate().is_err());

        settings.sessions.ttl_seconds = 60;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_persistence_validation() {
        let mut settings = Settings::default();
        settings.persistence.enabled = true;
        settings.persistence.scylla_hosts.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_dialogue_validation_propagates() {
        let mut settings = Settings::default();
        settings.dialogue.max_turns = 0;
        assert!(settings.validate().is_err());
    }
}
