//! Final call disposition

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome recorded once per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Confirmed,
    Rejected,
    AlreadyDone,
    NoResponse,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Confirmed => "confirmed",
            CallOutcome::Rejected => "rejected",
            CallOutcome::AlreadyDone => "already_done",
            CallOutcome::NoResponse => "no_response",
        }
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
