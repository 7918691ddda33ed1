//! Dialogue states and turn actions

use crate::call::{CollectedFields, TurnCounters};
use crate::intent::Intent;
use crate::outcome::CallOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation states of a reminder call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Reminder delivered, waiting for yes/no
    #[default]
    AwaitingInitialDecision,
    /// Customer declined, asked why
    AwaitingReason,
    /// Customer declined again after one persuasion
    AwaitingReasonPersisted,
    /// Waiting for a service date
    AwaitingDate,
    /// Tentative date read back, waiting for confirmation
    AwaitingDateConfirm,
    /// Waiting for a city or branch
    AwaitingBranch,
    /// Customer says the service is already done, asking where/when
    AwaitingServiceDetails,
    /// Terminal
    Ended,
}

impl DialogueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::AwaitingInitialDecision => "awaiting_initial_decision",
            DialogueState::AwaitingReason => "awaiting_reason",
            DialogueState::AwaitingReasonPersisted => "awaiting_reason_persisted",
            DialogueState::AwaitingDate => "awaiting_date",
            DialogueState::AwaitingDateConfirm => "awaiting_date_confirm",
            DialogueState::AwaitingBranch => "awaiting_branch",
            DialogueState::AwaitingServiceDetails => "awaiting_service_details",
            DialogueState::Ended => "ended",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DialogueState::Ended)
    }

    /// States where the agent is countering a refusal. A filler
    /// acknowledgment here is not a yes.
    pub fn is_objection_handling(&self) -> bool {
        matches!(
            self,
            DialogueState::AwaitingReason | DialogueState::AwaitingReasonPersisted
        )
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the state machine closed the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Date and branch captured
    Booked,
    /// Refusal accepted as final
    Rejected,
    /// Service already done, detail captured
    AlreadyDone,
    /// Too many unknown or empty turns
    NoResponse,
    /// Turn cap reached
    TurnCap,
    /// Persuasion budget spent while collecting the branch
    PersuasionExhausted,
}

/// Result of one pure turn decision. The orchestrator applies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueAction {
    /// Text to speak back
    pub reply: String,
    /// State after this turn
    pub next_state: DialogueState,
    /// Whether the call ends after the reply
    pub end_call: bool,
    /// Intent the decision was based on
    pub intent: Intent,
    /// Collected fields after this turn
    pub collected: CollectedFields,
    /// Counters after this turn
    pub counters: TurnCounters,
    /// Set when `end_call` is true
    pub end_reason: Option<EndReason>,
    /// Resolved from the pre-transition state; set when `end_call` is true
    pub outcome: Option<CallOutcome>,
}
