//! Call-record store connection
//!
//! Owns the ScyllaDB session the call-record sink writes through. The
//! keyspace name is spliced into CQL text, so it is checked before any
//! statement is built.

use crate::error::PersistenceError;
use crate::schema;
use scylla::{Session, SessionBuilder};
use std::sync::Arc;

/// Tables written for every finished call
pub const CALL_RECORDS_TABLE: &str = "call_records";
pub const CALL_RECORDS_BY_OUTCOME_TABLE: &str = "call_records_by_outcome";

/// Where finished-call records live
#[derive(Debug, Clone)]
pub struct CallStoreConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u8,
}

impl Default for CallStoreConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["127.0.0.1:9042".to_string()],
            keyspace: "reminder_agent".to_string(),
            replication_factor: 1,
        }
    }
}

impl CallStoreConfig {
    /// CQL keyspace names: letters, digits and underscores, at most 48 chars
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(PersistenceError::Connection(
                "no call-record store hosts configured".to_string(),
            ));
        }

        let ks = &self.keyspace;
        let well_formed = !ks.is_empty()
            && ks.len() <= 48
            && ks.starts_with(|c: char| c.is_ascii_alphabetic())
            && ks.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !well_formed {
            return Err(PersistenceError::SchemaError(format!(
                "invalid call-record keyspace name {:?}",
                ks
            )));
        }

        if self.replication_factor == 0 {
            return Err(PersistenceError::SchemaError(
                "call-record keyspace needs a replication factor of at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connected call-record store
#[derive(Clone)]
pub struct CallStore {
    session: Arc<Session>,
    config: CallStoreConfig,
}

impl CallStore {
    pub async fn connect(config: CallStoreConfig) -> Result<Self, PersistenceError> {
        config.validate()?;
        tracing::info!(hosts = ?config.hosts, keyspace = %config.keyspace, "Connecting call-record store");

        let session = SessionBuilder::new()
            .known_nodes(&config.hosts)
            .build()
            .await
            .map_err(|e| {
                PersistenceError::Connection(format!(
                    "call-record store at {}: {}",
                    config.hosts.join(","),
                    e
                ))
            })?;

        Ok(Self {
            session: Arc::new(session),
            config,
        })
    }

    /// Create the call-record keyspace and tables when missing
    pub async fn prepare(&self) -> Result<(), PersistenceError> {
        schema::create_keyspace(
            &self.session,
            &self.config.keyspace,
            self.config.replication_factor,
        )
        .await?;
        schema::create_tables(&self.session, &self.config.keyspace).await?;
        tracing::info!(keyspace = %self.config.keyspace, "Call-record tables ready");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `keyspace.table` for statements
    pub fn table(&self, table: &str) -> String {
        qualified(&self.config.keyspace, table)
    }
}

fn qualified(keyspace: &str, table: &str) -> String {
    format!("{}.{}", keyspace, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(keyspace: &str) -> CallStoreConfig {
        CallStoreConfig {
            keyspace: keyspace.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(CallStoreConfig::default().validate().is_ok());
        assert!(config("reminders_prod_2").validate().is_ok());
    }

    #[test]
    fn test_keyspace_must_be_plain_identifier() {
        for bad in ["", "2reminders", "reminders; DROP TABLE x", "rem-inders", "रिमाइंडर"] {
            assert!(
                matches!(config(bad).validate(), Err(PersistenceError::SchemaError(_))),
                "accepted {:?}",
                bad
            );
        }
        assert!(config(&"k".repeat(49)).validate().is_err());
    }

    #[test]
    fn test_hosts_and_replication_required() {
        let mut cfg = CallStoreConfig::default();
        cfg.hosts = vec![" ".to_string()];
        assert!(matches!(cfg.validate(), Err(PersistenceError::Connection(_))));

        let mut cfg = CallStoreConfig::default();
        cfg.replication_factor = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_qualified_table_names() {
        assert_eq!(
            qualified("reminder_agent", CALL_RECORDS_TABLE),
            "reminder_agent.call_records"
        );
        assert_eq!(
            qualified("ks", CALL_RECORDS_BY_OUTCOME_TABLE),
            "ks.call_records_by_outcome"
        );
    }
}
