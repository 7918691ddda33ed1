//! Call session management
//!
//! Active calls live in a sharded concurrent map keyed by call id, so turns
//! of unrelated calls never contend on one lock. Each session guards its
//! context with its own mutex; turns of one call are sequential anyway.
//!
//! Ending a call is claimed by removing the entry from the map. Whoever
//! removes it (turn, status signal, sweep, shutdown) force-ends the context
//! and writes the record; everybody else sees `None` and does nothing.

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use reminder_agent_config::SessionConfig;
use reminder_agent_core::{CallContext, CallOutcome};
use reminder_agent_persistence::{CallRecord, CallRecordSink};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::metrics;

/// One active call
pub struct CallSession {
    pub call_id: String,
    context: Mutex<CallContext>,
    created_at: Instant,
}

impl CallSession {
    fn new(context: CallContext) -> Self {
        Self {
            call_id: context.call_id.clone(),
            context: Mutex::new(context),
            created_at: Instant::now(),
        }
    }

    /// Lock the context. Never hold the guard across an await point.
    pub fn lock(&self) -> MutexGuard<'_, CallContext> {
        self.context.lock()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// Owner of every active call
pub struct SessionManager {
    sessions: DashMap<String, Arc<CallSession>>,
    sink: Arc<dyn CallRecordSink>,
    ttl: Duration,
    sweep_interval: Duration,
}

impl SessionManager {
    pub fn new(config: &SessionConfig, sink: Arc<dyn CallRecordSink>) -> Self {
        Self::with_timeouts(
            Duration::from_secs(config.ttl_seconds),
            Duration::from_secs(config.sweep_interval_seconds),
            sink,
        )
    }

    pub fn with_timeouts(
        ttl: Duration,
        sweep_interval: Duration,
        sink: Arc<dyn CallRecordSink>,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            sink,
            ttl,
            sweep_interval,
        }
    }

    /// Register a new call. An existing session with the same id is kept.
    pub fn insert(&self, context: CallContext) -> Arc<CallSession> {
        let call_id = context.call_id.clone();
        let session = self
            .sessions
            .entry(call_id.clone())
            .or_insert_with(|| Arc::new(CallSession::new(context)))
            .clone();

        tracing::info!(call_id = %call_id, active = self.sessions.len(), "Call session created");
        metrics::set_active_sessions(self.sessions.len());
        session
    }

    pub fn get(&self, call_id: &str) -> Option<Arc<CallSession>> {
        self.sessions.get(call_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// End a call and write its record.
    ///
    /// `outcome_if_open` is only used when the context has not ended through
    /// the state machine. Returns false when another caller already finished
    /// the call. Persistence failures are logged and swallowed.
    pub async fn finish(&self, call_id: &str, outcome_if_open: CallOutcome) -> bool {
        let Some((_, session)) = self.sessions.remove(call_id) else {
            return false;
        };
        metrics::set_active_sessions(self.sessions.len());

        let record = {
            let mut ctx = session.lock();
            if ctx.force_end(outcome_if_open) {
                tracing::info!(call_id, state = %ctx.state(), "Call force-ended");
            }
            CallRecord::from_context(&ctx)
        };

        tracing::info!(
            call_id,
            outcome = %record.outcome,
            turns = record.turn_count,
            "Call finished"
        );
        metrics::record_outcome(record.outcome);

        if let Err(e) = self.sink.persist(&record).await {
            metrics::record_persistence_failure();
            tracing::error!(call_id, error = %e, "Failed to persist call record");
        }
        true
    }

    /// Force-end every session older than the TTL
    pub async fn sweep_expired(&self) -> usize {
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_expired(self.ttl))
            .map(|entry| entry.key().clone())
            .collect();

        let mut swept = 0;
        for call_id in expired {
            if self.finish(&call_id, CallOutcome::NoResponse).await {
                tracing::info!(call_id = %call_id, "Expired call swept");
                swept += 1;
            }
        }
        swept
    }

    /// Finish every open call (shutdown)
    pub async fn finish_all(&self) -> usize {
        let mut finished = 0;
        for call_id in self.list() {
            if self.finish(&call_id, CallOutcome::NoResponse).await {
                finished += 1;
            }
        }
        finished
    }

    /// Start a background task that periodically sweeps expired calls.
    ///
    /// Returns a shutdown sender that stops the task.
    pub fn start_sweep_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.sweep_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let swept = manager.sweep_expired().await;
                        if swept > 0 {
                            tracing::info!(
                                "Session sweep: ended {} expired calls ({} remaining)",
                                swept,
                                manager.count()
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session sweep task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reminder_agent_core::CustomerInfo;
    use reminder_agent_persistence::InMemoryCallRecordSink;

    fn manager(ttl: Duration) -> (Arc<SessionManager>, Arc<InMemoryCallRecordSink>) {
        let sink = Arc::new(InMemoryCallRecordSink::new());
        let manager = Arc::new(SessionManager::with_timeouts(
            ttl,
            Duration::from_millis(10),
            sink.clone(),
        ));
        (manager, sink)
    }

    #[test]
    fn test_insert_and_get() {
        let (manager, _) = manager(Duration::from_secs(60));
        manager.insert(CallContext::new("a", CustomerInfo::default()));
        manager.insert(CallContext::new("b", CustomerInfo::default()));

        assert_eq!(manager.count(), 2);
        assert_eq!(manager.get("a").unwrap().call_id, "a");
        assert!(manager.get("c").is_none());
    }

    #[test]
    fn test_insert_keeps_existing_session() {
        let (manager, _) = manager(Duration::from_secs(60));
        let first = manager.insert(CallContext::new("a", CustomerInfo::default()));
        first.lock().set_opening("hello");

        let second = manager.insert(CallContext::new("a", CustomerInfo::default()));
        assert_eq!(second.lock().last_system_message.as_deref(), Some("hello"));
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test]
    async fn test_finish_is_exactly_once() {
        let (manager, sink) = manager(Duration::from_secs(60));
        manager.insert(CallContext::new("a", CustomerInfo::default()));

        assert!(manager.finish("a", CallOutcome::NoResponse).await);
        assert!(!manager.finish("a", CallOutcome::NoResponse).await);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get("a").unwrap().outcome, CallOutcome::NoResponse);
        assert_eq!(manager.count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_finish_persists_once() {
        let (manager, sink) = manager(Duration::from_secs(60));
        manager.insert(CallContext::new("race", CustomerInfo::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.finish("race", CallOutcome::NoResponse).await })
            })
            .collect();

        let mut claimed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                claimed += 1;
            }
        }
        assert_eq!(claimed, 1);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_ends_expired_sessions() {
        let (manager, sink) = manager(Duration::ZERO);
        manager.insert(CallContext::new("old", CustomerInfo::default()));
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(manager.sweep_expired().await, 1);
        assert_eq!(manager.count(), 0);
        assert_eq!(sink.get("old").unwrap().outcome, CallOutcome::NoResponse);
    }

    #[tokio::test]
    async fn test_sweep_keeps_fresh_sessions() {
        let (manager, sink) = manager(Duration::from_secs(60));
        manager.insert(CallContext::new("fresh", CustomerInfo::default()));

        assert_eq!(manager.sweep_expired().await, 0);
        assert_eq!(manager.count(), 1);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_task_runs_and_stops() {
        let (manager, sink) = manager(Duration::ZERO);
        manager.insert(CallContext::new("old", CustomerInfo::default()));

        let shutdown = manager.start_sweep_task();
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.send(true).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(manager.count(), 0);
    }
}
