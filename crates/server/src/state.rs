//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use reminder_agent_agent::DialogueEngine;
use reminder_agent_config::Settings;
use reminder_agent_persistence::{CallRecordSink, PendingCallDirectory};

use crate::orchestrator::CallOrchestrator;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    pub orchestrator: Arc<CallOrchestrator>,
    pub pending: Arc<dyn PendingCallDirectory>,
    /// Absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: Settings,
        engine: DialogueEngine,
        sink: Arc<dyn CallRecordSink>,
        pending: Arc<dyn PendingCallDirectory>,
    ) -> Self {
        let sessions = Arc::new(SessionManager::new(&config.sessions, sink));
        let orchestrator = Arc::new(CallOrchestrator::new(
            Arc::new(engine),
            Arc::clone(&sessions),
            Arc::clone(&pending),
        ));

        Self {
            config: Arc::new(config),
            sessions,
            orchestrator,
            pending,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
