//! Per-call context
//!
//! `CallContext` is the mutable record of one active call. Its dialogue
//! state only moves through [`CallContext::apply_action`] (a decision made
//! by the state machine) or [`CallContext::force_end`] (hangup, sweep).
//! The turn log is append-only.

use crate::dialogue::{DialogueAction, DialogueState};
use crate::error::{CallError, Result};
use crate::intent::Intent;
use crate::outcome::CallOutcome;
use crate::service_center::BranchMatch;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One customer speech turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    /// Recognition confidence in 0.0..=1.0
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
        }
    }

    /// Missing confidence defaults to 1.0; out-of-range values are clamped.
    pub fn with_confidence(text: impl Into<String>, confidence: Option<f32>) -> Self {
        let confidence = confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(1.0);
        Self {
            text: text.into(),
            confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Customer and asset fields pulled from the pending-call directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomerInfo {
    pub customer_name: String,
    pub asset_model: String,
    pub asset_id: String,
    pub service_type: String,
    pub due_date: String,
}

/// A concrete booking date, always after "today" in the anchor timezone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    pub display: String,
    pub iso: NaiveDate,
}

/// Fields gathered over the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CollectedFields {
    /// Raw date expression as extracted from speech
    pub date_token: Option<String>,
    /// Resolved date, absent when the token could not be resolved
    pub resolved_date: Option<ResolvedDate>,
    pub branch: Option<BranchMatch>,
    pub rejection_reason: Option<String>,
    pub already_done_detail: Option<String>,
}

impl CollectedFields {
    /// A date counts once a token was captured, resolved or not
    pub fn has_date(&self) -> bool {
        self.resolved_date.is_some() || self.date_token.is_some()
    }

    pub fn clear_date(&mut self) {
        self.date_token = None;
        self.resolved_date = None;
    }

    /// Human-readable date for replies and records
    pub fn date_display(&self) -> Option<&str> {
        self.resolved_date
            .as_ref()
            .map(|d| d.display.as_str())
            .or(self.date_token.as_deref())
    }
}

/// Retry and escalation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TurnCounters {
    pub silence_retries: u32,
    pub low_confidence_retries: u32,
    pub persuasion_count: u32,
    pub unknown_streak: u32,
    pub total_turns: u32,
}

/// Immutable log entry for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn_number: u32,
    pub state_at_turn: DialogueState,
    pub utterance_text: String,
    pub confidence: f32,
    pub intent: Intent,
    pub system_reply: String,
    pub timestamp: DateTime<Utc>,
}

/// Mutable record of one active call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallContext {
    pub call_id: String,
    pub customer: CustomerInfo,
    state: DialogueState,
    pub collected: CollectedFields,
    pub counters: TurnCounters,
    turns: Vec<TurnRecord>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub last_system_message: Option<String>,
    outcome: Option<CallOutcome>,
}

impl CallContext {
    pub fn new(call_id: impl Into<String>, customer: CustomerInfo) -> Self {
        let now = Utc::now();
        Self {
            call_id: call_id.into(),
            customer,
            state: DialogueState::default(),
            collected: CollectedFields::default(),
            counters: TurnCounters::default(),
            turns: Vec::new(),
            started_at: now,
            updated_at: now,
            ended_at: None,
            last_system_message: None,
            outcome: None,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    pub fn outcome(&self) -> Option<CallOutcome> {
        self.outcome
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_terminal()
    }

    /// Record the agent's opening line before the first customer turn
    pub fn set_opening(&mut self, message: impl Into<String>) {
        self.last_system_message = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Apply a state-machine decision: append the turn record, take over
    /// collected fields and counters, then advance the state.
    pub fn apply_action(
        &mut self,
        utterance: &Utterance,
        action: DialogueAction,
    ) -> Result<&TurnRecord> {
        if self.state.is_terminal() {
            return Err(CallError::SessionEnded(self.call_id.clone()));
        }

        let now = Utc::now();
        self.turns.push(TurnRecord {
            turn_number: self.turns.len() as u32 + 1,
            state_at_turn: self.state,
            utterance_text: utterance.text.clone(),
            confidence: utterance.confidence,
            intent: action.intent,
            system_reply: action.reply.clone(),
            timestamp: now,
        });

        self.collected = action.collected;
        self.counters = action.counters;
        self.last_system_message = Some(action.reply);
        self.updated_at = now;

        if action.end_call || action.next_state.is_terminal() {
            // outcome was resolved against the pre-transition state
            self.outcome = Some(action.outcome.unwrap_or(CallOutcome::NoResponse));
            self.ended_at = Some(now);
            self.state = DialogueState::Ended;
        } else {
            self.state = action.next_state;
        }

        // just pushed above
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// End the call outside the state machine (hangup, TTL sweep, internal
    /// failure). Keeps an outcome that was already set. Returns false when
    /// the call had already ended.
    pub fn force_end(&mut self, outcome: CallOutcome) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let now = Utc::now();
        self.outcome.get_or_insert(outcome);
        self.state = DialogueState::Ended;
        self.ended_at = Some(now);
        self.updated_at = now;
        true
    }
}
