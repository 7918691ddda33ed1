//! Intent Classification
//!
//! A fixed, inspectable rule cascade. Priority, highest first:
//! repeat > confusion > already_done > driver_unavailable > machine_busy >
//! working_fine > money_issue > call_later > date-bearing > confirm >
//! provide_branch > reject > unknown.
//!
//! Empty text is `unclear`; text that fits no category is `unknown`.
//!
//! # Example
//!
//! ```
//! use reminder_agent_text_processing::intent::IntentClassifier;
//! use reminder_agent_text_processing::normalize::normalize;
//! use reminder_agent_core::Intent;
//!
//! let classifier = IntentClassifier::new();
//! let raw = "Haan, book kar do";
//! assert_eq!(classifier.classify(&normalize(raw), raw, None), Intent::Confirm);
//! ```

mod patterns;

pub use patterns::{CategoryPatterns, IntentPatterns, PhraseSet, CASCADE_ORDER};

use crate::date::extract_date_token;
use reminder_agent_core::{BranchMatch, DialogueState, Intent};

/// Rule-cascade intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    patterns: IntentPatterns,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classifier over the built-in pattern tables
    pub fn new() -> Self {
        Self::with_patterns(IntentPatterns::default())
    }

    /// Classifier over custom tables. Phrases are normalized once here.
    pub fn with_patterns(patterns: IntentPatterns) -> Self {
        let categories = patterns
            .categories
            .into_iter()
            .map(|c| CategoryPatterns {
                intent: c.intent,
                set: c.set.normalized(),
            })
            .collect();
        let filler_acknowledgments = patterns
            .filler_acknowledgments
            .iter()
            .map(|f| crate::normalize::normalize(f))
            .filter(|f| !f.is_empty())
            .collect();

        Self {
            patterns: IntentPatterns {
                categories,
                filler_acknowledgments,
            },
        }
    }

    pub fn patterns(&self) -> &IntentPatterns {
        &self.patterns
    }

    /// Classify one utterance.
    ///
    /// `normalized` is the normalized text, `raw` the transcript as received
    /// (date extraction runs on it), `location` a pre-computed branch match.
    pub fn classify(&self, normalized: &str, raw: &str, location: Option<&BranchMatch>) -> Intent {
        if normalized.is_empty() {
            return Intent::Unclear;
        }

        for category in &self.patterns.categories {
            let hit = match category.intent {
                Intent::ProvideDate => {
                    category.set.matches(normalized) || extract_date_token(raw).is_some()
                }
                Intent::ProvideBranch => location.is_some(),
                _ => category.set.matches(normalized),
            };
            if hit {
                return category.intent;
            }
        }

        Intent::Unknown
    }

    /// Classify, then apply the genuine-confirm guard for `state`
    pub fn classify_in_state(
        &self,
        normalized: &str,
        raw: &str,
        location: Option<&BranchMatch>,
        state: DialogueState,
    ) -> Intent {
        let intent = self.classify(normalized, raw, location);
        self.apply_confirm_guard(intent, normalized, state)
    }

    /// A bare "accha" / "hmm" while the agent is countering a refusal is an
    /// acknowledgment, not a yes. Elsewhere any affirmative means proceed.
    pub fn apply_confirm_guard(
        &self,
        intent: Intent,
        normalized: &str,
        state: DialogueState,
    ) -> Intent {
        if intent == Intent::Confirm
            && state.is_objection_handling()
            && self.is_filler_only(normalized)
        {
            tracing::debug!(state = %state, text = normalized, "filler acknowledgment not taken as confirm");
            return Intent::Unknown;
        }
        intent
    }

    /// Every token is a filler acknowledgment
    pub fn is_filler_only(&self, normalized: &str) -> bool {
        let mut tokens = normalized.split_whitespace().peekable();
        tokens.peek().is_some()
            && tokens.all(|t| self.patterns.filler_acknowledgments.iter().any(|f| f == t))
    }

    /// First objection category present in the utterance, regardless of
    /// cascade position. Used when a "yes" carries an objection with it.
    pub fn co_occurring_objection(&self, normalized: &str) -> Option<Intent> {
        self.patterns
            .categories
            .iter()
            .find(|c| c.intent.is_objection() && c.set.matches(normalized))
            .map(|c| c.intent)
    }

    /// Whether the utterance signals postponement
    pub fn signals_postponement(&self, normalized: &str) -> bool {
        self.patterns
            .category(Intent::CallLater)
            .map_or(false, |set| set.matches(normalized))
    }
}
