//! ScyllaDB schema creation

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // One row per finished call; the turn log is stored as JSON
    let call_records = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.call_records (
            call_id TEXT,
            customer_name TEXT,
            asset_model TEXT,
            asset_id TEXT,
            service_type TEXT,
            due_date TEXT,
            outcome TEXT,
            date_token TEXT,
            service_date TEXT,
            service_date_display TEXT,
            branch_code TEXT,
            branch_name TEXT,
            branch_city TEXT,
            rejection_reason TEXT,
            already_done_detail TEXT,
            turn_count INT,
            turns_json TEXT,
            started_at TIMESTAMP,
            ended_at TIMESTAMP,
            PRIMARY KEY (call_id)
        )
    "#,
        keyspace
    );

    session.query_unpaged(call_records, &[]).await.map_err(|e| {
        PersistenceError::SchemaError(format!("Failed to create call_records table: {}", e))
    })?;

    // Outcome lookups for the follow-up team
    let by_outcome = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.call_records_by_outcome (
            outcome TEXT,
            ended_at TIMESTAMP,
            call_id TEXT,
            branch_code TEXT,
            service_date TEXT,
            PRIMARY KEY ((outcome), ended_at, call_id)
        ) WITH CLUSTERING ORDER BY (ended_at DESC, call_id ASC)
    "#,
        keyspace
    );

    session.query_unpaged(by_outcome, &[]).await.map_err(|e| {
        PersistenceError::SchemaError(format!(
            "Failed to create call_records_by_outcome table: {}",
            e
        ))
    })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
