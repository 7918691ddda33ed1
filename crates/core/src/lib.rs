//! Core types for the service-reminder dialogue engine
//!
//! This crate provides the vocabulary shared by every other crate:
//! - Intent tags produced by the classifier
//! - Dialogue states and the action a turn decision returns
//! - Call outcomes
//! - Per-call context (collected fields, counters, turn log)
//! - Service-center reference data
//! - Error types

pub mod call;
pub mod dialogue;
pub mod error;
pub mod intent;
pub mod outcome;
pub mod service_center;

pub use call::{
    CallContext, CollectedFields, CustomerInfo, ResolvedDate, TurnCounters, TurnRecord, Utterance,
};
pub use dialogue::{DialogueAction, DialogueState, EndReason};
pub use error::{CallError, Result};
pub use intent::Intent;
pub use outcome::CallOutcome;
pub use service_center::{BranchMatch, ServiceCenter};
