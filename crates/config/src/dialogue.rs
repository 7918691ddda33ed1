//! Dialogue policy
//!
//! Retry budgets, escalation caps and the business rules the state machine
//! consults. All values can be overridden from YAML or the environment, e.g.
//! `REMINDER_AGENT__DIALOGUE__MAX_TURNS=30`.

use crate::constants::{anchor, dialogue};
use crate::ConfigError;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// What a "no" means once the customer was already asked for a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RejectInDatePolicy {
    /// Accept the refusal and close the call as rejected
    #[default]
    EndCall,
    /// Skip the date and move on to branch collection
    AdvanceToBranch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialoguePolicy {
    /// Consecutive unknown/empty turns before the call is closed
    #[serde(default = "default_max_unknown_streak")]
    pub max_unknown_streak: u32,

    /// Empty utterances tolerated before the call is closed
    #[serde(default = "default_max_silence_retries")]
    pub max_silence_retries: u32,

    /// Recognition confidence below which the customer is asked to repeat
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f32,

    #[serde(default = "default_max_low_confidence_retries")]
    pub max_low_confidence_retries: u32,

    /// Counter-objection replies allowed per call
    #[serde(default = "default_max_persuasion_attempts")]
    pub max_persuasion_attempts: u32,

    /// Hard cap on customer turns
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// A captured date without a branch still counts as a confirmed booking
    #[serde(default = "default_true")]
    pub date_only_confirms: bool,

    #[serde(default)]
    pub reject_while_awaiting_date: RejectInDatePolicy,

    /// Civil-time anchor for date resolution, minutes east of UTC
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_max_unknown_streak() -> u32 {
    dialogue::MAX_UNKNOWN_STREAK
}
fn default_max_silence_retries() -> u32 {
    dialogue::MAX_SILENCE_RETRIES
}
fn default_low_confidence_threshold() -> f32 {
    dialogue::LOW_CONFIDENCE_THRESHOLD
}
fn default_max_low_confidence_retries() -> u32 {
    dialogue::MAX_LOW_CONFIDENCE_RETRIES
}
fn default_max_persuasion_attempts() -> u32 {
    dialogue::MAX_PERSUASION_ATTEMPTS
}
fn default_max_turns() -> u32 {
    dialogue::MAX_TURNS
}
fn default_true() -> bool {
    true
}
fn default_utc_offset_minutes() -> i32 {
    anchor::UTC_OFFSET_MINUTES
}

impl Default for DialoguePolicy {
    fn default() -> Self {
        Self {
            max_unknown_streak: default_max_unknown_streak(),
            max_silence_retries: default_max_silence_retries(),
            low_confidence_threshold: default_low_confidence_threshold(),
            max_low_confidence_retries: default_max_low_confidence_retries(),
            max_persuasion_attempts: default_max_persuasion_attempts(),
            max_turns: default_max_turns(),
            date_only_confirms: true,
            reject_while_awaiting_date: RejectInDatePolicy::default(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl DialoguePolicy {
    /// Anchor timezone for "today". Out-of-range offsets are rejected by
    /// `validate`; should one slip through, UTC is used.
    pub fn anchor_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_unknown_streak == 0 {
            return Err(invalid("dialogue.max_unknown_streak", "must be at least 1"));
        }
        if self.max_silence_retries == 0 {
            return Err(invalid("dialogue.max_silence_retries", "must be at least 1"));
        }
        if self.max_turns == 0 {
            return Err(invalid("dialogue.max_turns", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(invalid(
                "dialogue.low_confidence_threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.utc_offset_minutes.abs() > anchor::MAX_OFFSET_MINUTES {
            return Err(invalid(
                "dialogue.utc_offset_minutes",
                "must be within ±840 minutes",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
