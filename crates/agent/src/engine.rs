//! Dialogue engine
//!
//! Ties the text-processing helpers to the state machine. All parts are
//! immutable after construction, so one engine is shared by every call.

use crate::dialogue::{decide, TurnInput};
use crate::prompts;
use crate::AgentError;
use chrono::NaiveDate;
use reminder_agent_config::DialoguePolicy;
use reminder_agent_core::{
    CallContext, CallError, CustomerInfo, DialogueAction, DialogueState, ResolvedDate,
    ServiceCenter, Utterance,
};
use reminder_agent_text_processing::{
    extract_date_token, normalize, resolve_date_at, DateResolver, IntentClassifier, LocationMatcher,
};

/// Analysis plus decision for one turn
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    classifier: IntentClassifier,
    locations: LocationMatcher,
    dates: DateResolver,
    policy: DialoguePolicy,
}

impl DialogueEngine {
    /// Engine over the built-in intent tables
    pub fn new(policy: DialoguePolicy, centers: &[ServiceCenter]) -> Result<Self, AgentError> {
        Self::with_classifier(policy, centers, IntentClassifier::new())
    }

    pub fn with_classifier(
        policy: DialoguePolicy,
        centers: &[ServiceCenter],
        classifier: IntentClassifier,
    ) -> Result<Self, AgentError> {
        policy.validate()?;
        let locations = LocationMatcher::new(centers);
        if locations.is_empty() {
            return Err(AgentError::NoActiveCenters);
        }

        Ok(Self {
            classifier,
            locations,
            dates: DateResolver::new(policy.anchor_offset()),
            policy,
        })
    }

    pub fn policy(&self) -> &DialoguePolicy {
        &self.policy
    }

    /// Today in the anchor timezone
    pub fn today(&self) -> NaiveDate {
        self.dates.today()
    }

    pub fn opening(&self, customer: &CustomerInfo) -> String {
        prompts::opening(customer)
    }

    /// Run every pure helper over the utterance
    pub fn analyze_at(
        &self,
        utterance: &Utterance,
        state: DialogueState,
        today: NaiveDate,
    ) -> TurnInput {
        let raw = utterance.text.as_str();
        let normalized = normalize(raw);
        let branch = self.locations.find(raw);
        let intent =
            self.classifier
                .classify_in_state(&normalized, raw, branch.as_ref(), state);

        let date_token = extract_date_token(raw);
        let resolved_date = date_token.as_deref().and_then(|token| {
            resolve_token(token, today)
                .map_err(|e| tracing::warn!(error = %e, "keeping raw date token"))
                .ok()
        });

        TurnInput {
            secondary_objection: self.classifier.co_occurring_objection(&normalized),
            postponement: self.classifier.signals_postponement(&normalized),
            raw: raw.to_string(),
            normalized,
            confidence: utterance.confidence,
            intent,
            date_token,
            resolved_date,
            branch,
        }
    }

    /// Decide the turn against the context as it stands
    pub fn process(&self, ctx: &CallContext, utterance: &Utterance) -> DialogueAction {
        self.process_at(ctx, utterance, self.today())
    }

    pub fn process_at(
        &self,
        ctx: &CallContext,
        utterance: &Utterance,
        today: NaiveDate,
    ) -> DialogueAction {
        let input = self.analyze_at(utterance, ctx.state(), today);
        let action = decide(&input, ctx, &self.policy);

        tracing::debug!(
            call_id = %ctx.call_id,
            state = %ctx.state(),
            intent = %action.intent,
            next_state = %action.next_state,
            end_call = action.end_call,
            "turn decided"
        );
        action
    }
}

/// What the call orchestrator needs from a dialogue engine
pub trait TurnEngine: Send + Sync {
    /// Personalized first line of the call
    fn opening(&self, customer: &CustomerInfo) -> String;

    /// Decide one turn without touching the context
    fn process(&self, ctx: &CallContext, utterance: &Utterance) -> DialogueAction;
}

impl TurnEngine for DialogueEngine {
    fn opening(&self, customer: &CustomerInfo) -> String {
        DialogueEngine::opening(self, customer)
    }

    fn process(&self, ctx: &CallContext, utterance: &Utterance) -> DialogueAction {
        DialogueEngine::process(self, ctx, utterance)
    }
}

/// An unresolvable token is not a turn failure; the caller keeps the raw text
fn resolve_token(token: &str, today: NaiveDate) -> Result<ResolvedDate, CallError> {
    resolve_date_at(token, today).ok_or_else(|| CallError::UnresolvableDate(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reminder_agent_config::ServiceCentersConfig;
    use reminder_agent_core::{CallOutcome, Intent};

    fn engine() -> DialogueEngine {
        let centers = ServiceCentersConfig::default().active_centers();
        DialogueEngine::new(DialoguePolicy::default(), &centers).unwrap()
    }

    /// Friday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn context() -> CallContext {
        let mut ctx = CallContext::new(
            "call-42",
            CustomerInfo {
                customer_name: "Mahesh".into(),
                asset_model: "3DX".into(),
                asset_id: "HAR3DX5678".into(),
                service_type: "500 hour".into(),
                due_date: "22 October".into(),
            },
        );
        ctx.set_opening(prompts::opening(&ctx.customer));
        ctx
    }

    fn say(engine: &DialogueEngine, ctx: &mut CallContext, text: &str) -> DialogueAction {
        let utterance = Utterance::new(text);
        let action = engine.process_at(ctx, &utterance, today());
        ctx.apply_action(&utterance, action.clone()).unwrap();
        action
    }

    #[test]
    fn test_rejects_directory_without_active_center() {
        let result = DialogueEngine::new(DialoguePolicy::default(), &[]);
        assert!(matches!(result, Err(AgentError::NoActiveCenters)));
    }

    #[test]
    fn test_rejects_invalid_policy() {
        let centers = ServiceCentersConfig::default().active_centers();
        let policy = DialoguePolicy {
            low_confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            DialogueEngine::new(policy, &centers),
            Err(AgentError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_analyze_date_utterance() {
        let input = engine().analyze_at(
            &Utterance::new("25 तारीख को"),
            DialogueState::AwaitingDate,
            today(),
        );
        assert_eq!(input.intent, Intent::ProvideDate);
        assert_eq!(input.date_token.as_deref(), Some("25 तारीख"));
        assert_eq!(
            input.resolved_date.unwrap().iso,
            NaiveDate::from_ymd_opt(2026, 10, 25).unwrap()
        );
    }

    #[test]
    fn test_unresolvable_token_kept_raw() {
        let input = engine().analyze_at(
            &Utterance::new("1/1/2020 ko"),
            DialogueState::AwaitingDate,
            today(),
        );
        assert_eq!(input.date_token.as_deref(), Some("1/1/2020"));
        assert!(input.resolved_date.is_none());
        assert_eq!(
            resolve_token("1/1/2020", today()),
            Err(CallError::UnresolvableDate("1/1/2020".into()))
        );
    }

    #[test]
    fn test_analyze_branch_utterance() {
        let input = engine().analyze_at(
            &Utterance::new("जयपुर"),
            DialogueState::AwaitingBranch,
            today(),
        );
        assert_eq!(input.intent, Intent::ProvideBranch);
        assert_eq!(input.branch.unwrap().code, "JPR01");
    }

    #[test]
    fn test_full_booking() {
        let engine = engine();
        let mut ctx = context();

        let action = say(&engine, &mut ctx, "haan book kar do");
        assert_eq!(action.intent, Intent::Confirm);
        assert_eq!(ctx.state(), DialogueState::AwaitingDate);

        say(&engine, &mut ctx, "25 तारीख को");
        assert_eq!(ctx.state(), DialogueState::AwaitingDateConfirm);
        assert_eq!(ctx.collected.date_token.as_deref(), Some("25 तारीख"));

        say(&engine, &mut ctx, "haan sahi hai");
        assert_eq!(ctx.state(), DialogueState::AwaitingBranch);

        let action = say(&engine, &mut ctx, "जयपुर");
        assert!(action.end_call);
        assert_eq!(ctx.state(), DialogueState::Ended);
        assert_eq!(ctx.outcome(), Some(CallOutcome::Confirmed));
        assert_eq!(ctx.collected.branch.as_ref().unwrap().code, "JPR01");
        assert_eq!(ctx.turns().len(), 4);
    }

    #[test]
    fn test_already_done_path() {
        let engine = engine();
        let mut ctx = context();

        say(&engine, &mut ctx, "service pehle hi karwa li");
        assert_eq!(ctx.state(), DialogueState::AwaitingServiceDetails);

        say(&engine, &mut ctx, "das din pehle jaipur mein");
        assert_eq!(ctx.outcome(), Some(CallOutcome::AlreadyDone));
        assert_eq!(
            ctx.collected.already_done_detail.as_deref(),
            Some("das din pehle jaipur mein")
        );
    }

    #[test]
    fn test_filler_in_objection_state_is_not_yes() {
        let engine = engine();
        let mut ctx = context();

        say(&engine, &mut ctx, "nahi");
        assert_eq!(ctx.state(), DialogueState::AwaitingReason);

        let action = say(&engine, &mut ctx, "accha");
        assert_ne!(action.intent, Intent::Confirm);
        assert_ne!(ctx.state(), DialogueState::AwaitingDate);
    }
}
