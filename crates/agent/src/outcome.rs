//! Outcome resolution
//!
//! Invoked once per call, when the state machine signals termination, with
//! the state as it was *before* the terminating transition. Rules in order:
//!
//! 1. not terminating → `no_response`
//! 2. pre-transition state `awaiting_service_details` → `already_done`
//! 3. date and branch present → `confirmed`
//! 4. date without branch → `confirmed` when `date_only_confirms` is on
//! 5. explicit reject (intent or a rejection close) → `rejected`
//! 6. anything else → `no_response`

use reminder_agent_config::DialoguePolicy;
use reminder_agent_core::{CallOutcome, CollectedFields, DialogueState, EndReason, Intent};

/// Facts the resolver looks at
#[derive(Debug, Clone, Copy)]
pub struct OutcomeInputs<'a> {
    pub terminating: bool,
    pub pre_state: DialogueState,
    /// Collected fields including this turn's updates
    pub collected: &'a CollectedFields,
    pub intent: Intent,
    pub end_reason: Option<EndReason>,
}

pub fn resolve_outcome(inputs: OutcomeInputs<'_>, policy: &DialoguePolicy) -> CallOutcome {
    if !inputs.terminating {
        return CallOutcome::NoResponse;
    }
    if inputs.pre_state == DialogueState::AwaitingServiceDetails {
        return CallOutcome::AlreadyDone;
    }

    let has_date = inputs.collected.has_date();
    if has_date && inputs.collected.branch.is_some() {
        return CallOutcome::Confirmed;
    }
    if has_date && policy.date_only_confirms {
        return CallOutcome::Confirmed;
    }

    if inputs.intent == Intent::Reject || inputs.end_reason == Some(EndReason::Rejected) {
        return CallOutcome::Rejected;
    }

    CallOutcome::NoResponse
}
