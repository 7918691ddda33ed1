//! Prometheus metrics
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder (tests) every call is a no-op.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reminder_agent_core::{CallOutcome, Intent};

use crate::ServerError;

/// Install the global Prometheus recorder. Only one recorder can be
/// installed per process.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        ServerError::Internal(format!("failed to install Prometheus recorder: {e}"))
    })?;
    register_metrics();
    Ok(handle)
}

fn register_metrics() {
    describe_counter!("reminder_calls_started_total", "Calls started");
    describe_counter!("reminder_turns_total", "Customer turns processed, by intent");
    describe_counter!("reminder_call_outcomes_total", "Finished calls, by outcome");
    describe_counter!(
        "reminder_persistence_failures_total",
        "Call records that could not be written"
    );
    describe_gauge!("reminder_active_sessions", "Calls currently in progress");
    describe_histogram!(
        "reminder_turn_latency_seconds",
        "Time to decide one turn in seconds"
    );
}

pub fn record_call_started() {
    metrics::counter!("reminder_calls_started_total").increment(1);
}

pub fn record_turn(intent: Intent, seconds: f64) {
    metrics::counter!("reminder_turns_total", "intent" => intent.as_str()).increment(1);
    metrics::histogram!("reminder_turn_latency_seconds").record(seconds);
}

pub fn record_outcome(outcome: CallOutcome) {
    metrics::counter!("reminder_call_outcomes_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_persistence_failure() {
    metrics::counter!("reminder_persistence_failures_total").increment(1);
}

pub fn set_active_sessions(count: usize) {
    metrics::gauge!("reminder_active_sessions").set(count as f64);
}
