//! Persistence errors

use reminder_agent_core::CallError;
use scylla::transport::errors::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Duplicate record for call {0}")]
    Duplicate(String),
}

impl From<QueryError> for PersistenceError {
    fn from(err: QueryError) -> Self {
        PersistenceError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for CallError {
    fn from(err: PersistenceError) -> Self {
        CallError::Persistence(err.to_string())
    }
}
