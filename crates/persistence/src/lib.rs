//! Persistence for finished reminder calls
//!
//! Provides:
//! - Call records (one durable write per finished call)
//! - The pending-call directory consulted at call start
//! - ScyllaDB and in-memory implementations of both seams

pub mod error;
pub mod pending;
pub mod records;
pub mod schema;
pub mod store;

pub use error::PersistenceError;
pub use pending::{InMemoryPendingCalls, PendingCallDirectory};
pub use records::{
    CallRecord, CallRecordSink, InMemoryCallRecordSink, ScyllaCallRecordSink,
};
pub use store::{CallStore, CallStoreConfig};

/// Connect the call-record store, create its tables and return the sink
pub async fn init(config: CallStoreConfig) -> Result<ScyllaCallRecordSink, PersistenceError> {
    let store = CallStore::connect(config).await?;
    store.prepare().await?;
    Ok(ScyllaCallRecordSink::new(store))
}
