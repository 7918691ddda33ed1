//! Pending-call directory
//!
//! The dialer registers customer and asset fields before placing a call.
//! Call start consumes the entry, so the same call id cannot start twice.

use crate::PersistenceError;
use async_trait::async_trait;
use dashmap::DashMap;
use reminder_agent_core::CustomerInfo;

#[async_trait]
pub trait PendingCallDirectory: Send + Sync {
    /// Remove and return the entry for `call_id`
    async fn take(&self, call_id: &str) -> Result<Option<CustomerInfo>, PersistenceError>;

    async fn register(&self, call_id: &str, info: CustomerInfo) -> Result<(), PersistenceError>;

    async fn pending_count(&self) -> Result<usize, PersistenceError>;
}

#[derive(Default)]
pub struct InMemoryPendingCalls {
    entries: DashMap<String, CustomerInfo>,
}

impl InMemoryPendingCalls {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingCallDirectory for InMemoryPendingCalls {
    async fn take(&self, call_id: &str) -> Result<Option<CustomerInfo>, PersistenceError> {
        Ok(self.entries.remove(call_id).map(|(_, info)| info))
    }

    async fn register(&self, call_id: &str, info: CustomerInfo) -> Result<(), PersistenceError> {
        if self.entries.insert(call_id.to_string(), info).is_some() {
            tracing::debug!(call_id, "pending call replaced");
        }
        Ok(())
    }

    async fn pending_count(&self) -> Result<usize, PersistenceError> {
        Ok(self.entries.len())
    }
}
