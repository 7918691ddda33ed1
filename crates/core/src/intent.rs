//! Intent tags
//!
//! One tag is assigned to every customer utterance. The set is closed; the
//! classifier never invents new tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of a single utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Agrees to book / proceed
    Confirm,
    /// Declines
    Reject,
    /// Service was already carried out elsewhere or earlier
    AlreadyDone,
    /// Driver or operator not available
    DriverUnavailable,
    /// Machine is busy on a job site
    MachineBusy,
    /// Machine works fine, no need for service
    WorkingFine,
    /// Cost or budget concern
    MoneyIssue,
    /// Asks to be called later
    CallLater,
    /// Mentions a date or asks to reschedule
    ProvideDate,
    /// Mentions a known city or branch
    ProvideBranch,
    /// Asks the agent to repeat itself
    Repeat,
    /// Does not understand who is calling or why
    Confusion,
    /// Nothing was said
    Unclear,
    /// Said something that fits no category
    #[default]
    Unknown,
}

impl Intent {
    /// All tags in declaration order
    pub const ALL: [Intent; 14] = [
        Intent::Confirm,
        Intent::Reject,
        Intent::AlreadyDone,
        Intent::DriverUnavailable,
        Intent::MachineBusy,
        Intent::WorkingFine,
        Intent::MoneyIssue,
        Intent::CallLater,
        Intent::ProvideDate,
        Intent::ProvideBranch,
        Intent::Repeat,
        Intent::Confusion,
        Intent::Unclear,
        Intent::Unknown,
    ];

    /// Wire / storage tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Confirm => "confirm",
            Intent::Reject => "reject",
            Intent::AlreadyDone => "already_done",
            Intent::DriverUnavailable => "driver_unavailable",
            Intent::MachineBusy => "machine_busy",
            Intent::WorkingFine => "working_fine",
            Intent::MoneyIssue => "money_issue",
            Intent::CallLater => "call_later",
            Intent::ProvideDate => "provide_date",
            Intent::ProvideBranch => "provide_branch",
            Intent::Repeat => "repeat",
            Intent::Confusion => "confusion",
            Intent::Unclear => "unclear",
            Intent::Unknown => "unknown",
        }
    }

    /// Objections answered with a scripted counter before asking for a date.
    ///
    /// `AlreadyDone` is deliberately excluded: it opens its own branch.
    pub fn is_objection(&self) -> bool {
        matches!(
            self,
            Intent::DriverUnavailable
                | Intent::MachineBusy
                | Intent::WorkingFine
                | Intent::MoneyIssue
                | Intent::CallLater
        )
    }

    /// Counts towards the unknown streak
    pub fn is_non_answer(&self) -> bool {
        matches!(self, Intent::Unknown | Intent::Unclear)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tag_matches_as_str() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
    }

    #[test]
    fn test_objection_set() {
        assert!(Intent::MoneyIssue.is_objection());
        assert!(Intent::CallLater.is_objection());
        assert!(!Intent::AlreadyDone.is_objection());
        assert!(!Intent::Reject.is_objection());
    }

    #[test]
    fn test_non_answer() {
        assert!(Intent::Unclear.is_non_answer());
        assert!(Intent::Unknown.is_non_answer());
        assert!(!Intent::Repeat.is_non_answer());
    }
}
