//! Finished-call records
//!
//! A [`CallRecord`] is built once from the final [`CallContext`] and handed
//! to a [`CallRecordSink`]. The session manager guarantees a single write per
//! call id; the in-memory sink still refuses duplicates so tests can see a
//! double write.

use crate::store::{CallStore, CALL_RECORDS_BY_OUTCOME_TABLE, CALL_RECORDS_TABLE};
use crate::PersistenceError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use reminder_agent_core::{CallContext, CallOutcome, CustomerInfo, TurnCounters, TurnRecord};
use scylla::frame::value::CqlTimestamp;
use serde::{Deserialize, Serialize};

/// Durable summary of one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    pub customer: CustomerInfo,
    pub outcome: CallOutcome,
    pub date_token: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub service_date_display: Option<String>,
    pub branch_code: Option<String>,
    pub branch_name: Option<String>,
    pub branch_city: Option<String>,
    pub rejection_reason: Option<String>,
    pub already_done_detail: Option<String>,
    pub counters: TurnCounters,
    pub turn_count: u32,
    pub turns: Vec<TurnRecord>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl CallRecord {
    /// Snapshot a finished (or force-ended) call
    pub fn from_context(ctx: &CallContext) -> Self {
        let collected = &ctx.collected;
        let branch = collected.branch.as_ref();
        Self {
            call_id: ctx.call_id.clone(),
            customer: ctx.customer.clone(),
            outcome: ctx.outcome().unwrap_or(CallOutcome::NoResponse),
            date_token: collected.date_token.clone(),
            service_date: collected.resolved_date.as_ref().map(|d| d.iso),
            service_date_display: collected.date_display().map(str::to_string),
            branch_code: branch.map(|b| b.code.clone()),
            branch_name: branch.map(|b| b.name.clone()),
            branch_city: branch.map(|b| b.city.clone()),
            rejection_reason: collected.rejection_reason.clone(),
            already_done_detail: collected.already_done_detail.clone(),
            counters: ctx.counters,
            turn_count: ctx.turns().len() as u32,
            turns: ctx.turns().to_vec(),
            started_at: ctx.started_at,
            ended_at: ctx.ended_at.unwrap_or(ctx.updated_at),
        }
    }
}

/// Destination for finished calls
#[async_trait]
pub trait CallRecordSink: Send + Sync {
    async fn persist(&self, record: &CallRecord) -> Result<(), PersistenceError>;
}

/// Keeps records in memory (tests, local runs without a database)
#[derive(Default)]
pub struct InMemoryCallRecordSink {
    records: Mutex<Vec<CallRecord>>,
}

impl InMemoryCallRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.records.lock().clone()
    }

    pub fn get(&self, call_id: &str) -> Option<CallRecord> {
        self.records
            .lock()
            .iter()
            .find(|r| r.call_id == call_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl CallRecordSink for InMemoryCallRecordSink {
    async fn persist(&self, record: &CallRecord) -> Result<(), PersistenceError> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.call_id == record.call_id) {
            return Err(PersistenceError::Duplicate(record.call_id.clone()));
        }
        records.push(record.clone());
        Ok(())
    }
}

#[derive(scylla::SerializeRow)]
struct CallRecordRow<'a> {
    call_id: &'a str,
    customer_name: &'a str,
    asset_model: &'a str,
    asset_id: &'a str,
    service_type: &'a str,
    due_date: &'a str,
    outcome: &'a str,
    date_token: Option<&'a str>,
    service_date: Option<String>,
    service_date_display: Option<&'a str>,
    branch_code: Option<&'a str>,
    branch_name: Option<&'a str>,
    branch_city: Option<&'a str>,
    rejection_reason: Option<&'a str>,
    already_done_detail: Option<&'a str>,
    turn_count: i32,
    turns_json: String,
    started_at: CqlTimestamp,
    ended_at: CqlTimestamp,
}

/// ScyllaDB implementation of the call-record sink
#[derive(Clone)]
pub struct ScyllaCallRecordSink {
    store: CallStore,
}

impl ScyllaCallRecordSink {
    pub fn new(store: CallStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CallRecordSink for ScyllaCallRecordSink {
    async fn persist(&self, record: &CallRecord) -> Result<(), PersistenceError> {
        let service_date = record.service_date.map(|d| d.to_string());
        let row = CallRecordRow {
            call_id: &record.call_id,
            customer_name: &record.customer.customer_name,
            asset_model: &record.customer.asset_model,
            asset_id: &record.customer.asset_id,
            service_type: &record.customer.service_type,
            due_date: &record.customer.due_date,
            outcome: record.outcome.as_str(),
            date_token: record.date_token.as_deref(),
            service_date: service_date.clone(),
            service_date_display: record.service_date_display.as_deref(),
            branch_code: record.branch_code.as_deref(),
            branch_name: record.branch_name.as_deref(),
            branch_city: record.branch_city.as_deref(),
            rejection_reason: record.rejection_reason.as_deref(),
            already_done_detail: record.already_done_detail.as_deref(),
            turn_count: record.turn_count as i32,
            turns_json: serde_json::to_string(&record.turns)?,
            started_at: CqlTimestamp(record.started_at.timestamp_millis()),
            ended_at: CqlTimestamp(record.ended_at.timestamp_millis()),
        };

        let query = format!(
            "INSERT INTO {} (
                call_id, customer_name, asset_model, asset_id, service_type, due_date,
                outcome, date_token, service_date, service_date_display,
                branch_code, branch_name, branch_city, rejection_reason, already_done_detail,
                turn_count, turns_json, started_at, ended_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.store.table(CALL_RECORDS_TABLE)
        );
        self.store.session().query_unpaged(query, row).await?;

        let index = format!(
            "INSERT INTO {} (outcome, ended_at, call_id, branch_code, service_date)
             VALUES (?, ?, ?, ?, ?)",
            self.store.table(CALL_RECORDS_BY_OUTCOME_TABLE)
        );
        self.store
            .session()
            .query_unpaged(
                index,
                (
                    record.outcome.as_str(),
                    CqlTimestamp(record.ended_at.timestamp_millis()),
                    &record.call_id,
                    record.branch_code.as_deref(),
                    service_date,
                ),
            )
            .await?;

        tracing::info!(
            call_id = %record.call_id,
            outcome = %record.outcome,
            turns = record.turn_count,
            "Call record written to ScyllaDB"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reminder_agent_core::{
        BranchMatch, CollectedFields, DialogueAction, DialogueState, EndReason, Intent,
        ResolvedDate, Utterance,
    };

    fn finished_call() -> CallContext {
        let mut ctx = CallContext::new(
            "call-7",
            CustomerInfo {
                customer_name: "Rakesh".into(),
                asset_model: "3DX".into(),
                asset_id: "A-77".into(),
                service_type: "500 hour".into(),
                due_date: "20 October".into(),
            },
        );
        let collected = CollectedFields {
            date_token: Some("25 tarikh".into()),
            resolved_date: Some(ResolvedDate {
                display: "Sunday, 25 October 2026".into(),
                iso: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            }),
            branch: Some(BranchMatch {
                code: "JPR01".into(),
                name: "Sitapura".into(),
                city: "Jaipur".into(),
                address: String::new(),
            }),
            ..Default::default()
        };
        ctx.apply_action(
            &Utterance::new("jaipur"),
            DialogueAction {
                reply: "booked".into(),
                next_state: DialogueState::Ended,
                end_call: true,
                intent: Intent::ProvideBranch,
                collected,
                counters: Default::default(),
                end_reason: Some(EndReason::Booked),
                outcome: Some(CallOutcome::Confirmed),
            },
        )
        .unwrap();
        ctx
    }

    #[test]
    fn test_record_from_context() {
        let record = CallRecord::from_context(&finished_call());
        assert_eq!(record.outcome, CallOutcome::Confirmed);
        assert_eq!(record.branch_code.as_deref(), Some("JPR01"));
        assert_eq!(record.service_date, NaiveDate::from_ymd_opt(2026, 10, 25));
        assert_eq!(record.turn_count, 1);
        assert_eq!(record.turns[0].utterance_text, "jaipur");
    }

    #[test]
    fn test_open_call_defaults_to_no_response() {
        let ctx = CallContext::new("call-8", CustomerInfo::default());
        let record = CallRecord::from_context(&ctx);
        assert_eq!(record.outcome, CallOutcome::NoResponse);
        assert_eq!(record.turn_count, 0);
    }

    #[tokio::test]
    async fn test_in_memory_sink_refuses_duplicates() {
        let sink = InMemoryCallRecordSink::new();
        let record = CallRecord::from_context(&finished_call());

        sink.persist(&record).await.unwrap();
        assert!(matches!(
            sink.persist(&record).await,
            Err(PersistenceError::Duplicate(_))
        ));
        assert_eq!(sink.len(), 1);
        assert!(sink.get("call-7").is_some());
    }
}
