//! Reminder-call dialogue agent
//!
//! Features:
//! - Pure turn decision over the dialogue states
//! - Retry and escalation guards (unknown streak, silence, low confidence, turn cap)
//! - Persuasion budget for objections and refusals
//! - Outcome resolution against the pre-transition state
//! - Hindi reply templates
//!
//! The engine analyzes an utterance once (normalize, classify, extract and
//! resolve a date, match a branch) and hands the facts to [`decide`], which
//! returns a [`DialogueAction`](reminder_agent_core::DialogueAction). Applying
//! the action is the caller's job.

pub mod dialogue;
pub mod engine;
pub mod outcome;
pub mod prompts;

pub use dialogue::{decide, TurnInput};
pub use engine::{DialogueEngine, TurnEngine};
pub use outcome::{resolve_outcome, OutcomeInputs};

use thiserror::Error;

/// Errors raised while building an engine
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid dialogue policy: {0}")]
    InvalidPolicy(String),

    #[error("Service-center directory has no active center")]
    NoActiveCenters,
}

impl From<reminder_agent_config::ConfigError> for AgentError {
    fn from(err: reminder_agent_config::ConfigError) -> Self {
        AgentError::InvalidPolicy(err.to_string())
    }
}
