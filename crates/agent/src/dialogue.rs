//! Dialogue state machine
//!
//! [`decide`] is a pure function of the analyzed turn, the call snapshot and
//! the policy. It never touches the context; the returned action carries the
//! reply, the next state, the updated fields and counters, and (on
//! termination) the outcome resolved against the state before this turn.
//!
//! Global guards run before the per-state table, in order:
//! unknown streak / silence exhaustion, low confidence, repeat, confusion,
//! unclear. The turn cap is applied last, to a transition that did not
//! already close the call.

use crate::outcome::{resolve_outcome, OutcomeInputs};
use crate::prompts;
use reminder_agent_config::{DialoguePolicy, RejectInDatePolicy};
use reminder_agent_core::{
    BranchMatch, CallContext, CollectedFields, DialogueAction, DialogueState, EndReason, Intent,
    ResolvedDate, TurnCounters,
};

/// Everything the state machine needs to know about one utterance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurnInput {
    /// Transcript as received
    pub raw: String,
    pub normalized: String,
    pub confidence: f32,
    /// Classified intent, after the genuine-confirm guard
    pub intent: Intent,
    pub date_token: Option<String>,
    /// `None` when there is no token or it could not be resolved
    pub resolved_date: Option<ResolvedDate>,
    pub branch: Option<BranchMatch>,
    /// Objection phrase present next to a higher-ranked intent
    pub secondary_objection: Option<Intent>,
    /// Utterance asks to postpone
    pub postponement: bool,
}

impl TurnInput {
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Decide one turn
pub fn decide(input: &TurnInput, ctx: &CallContext, policy: &DialoguePolicy) -> DialogueAction {
    if ctx.is_ended() {
        return DialogueAction {
            reply: prompts::session_expired(),
            next_state: DialogueState::Ended,
            end_call: true,
            intent: input.intent,
            collected: ctx.collected.clone(),
            counters: ctx.counters,
            end_reason: None,
            outcome: ctx.outcome(),
        };
    }

    let mut counters = ctx.counters;
    counters.total_turns += 1;
    counters.unknown_streak = if input.intent.is_non_answer() {
        counters.unknown_streak + 1
    } else {
        0
    };
    if input.is_empty() {
        counters.silence_retries += 1;
    }

    let step = Step {
        input,
        ctx,
        policy,
        collected: ctx.collected.clone(),
        counters,
    };

    let action = step.run();
    if !action.end_call && action.counters.total_turns >= policy.max_turns {
        return close_at_turn_cap(action, ctx, policy);
    }
    action
}

fn close_at_turn_cap(
    action: DialogueAction,
    ctx: &CallContext,
    policy: &DialoguePolicy,
) -> DialogueAction {
    tracing::info!(call_id = %ctx.call_id, turns = action.counters.total_turns, "turn cap reached");
    let input = TurnInput {
        intent: action.intent,
        ..Default::default()
    };
    Step {
        input: &input,
        ctx,
        policy,
        collected: action.collected,
        counters: action.counters,
    }
    .close(EndReason::TurnCap)
}

struct Step<'a> {
    input: &'a TurnInput,
    ctx: &'a CallContext,
    policy: &'a DialoguePolicy,
    collected: CollectedFields,
    counters: TurnCounters,
}

impl<'a> Step<'a> {
    fn run(mut self) -> DialogueAction {
        let state = self.ctx.state();
        let input = self.input;

        if self.counters.unknown_streak >= self.policy.max_unknown_streak
            || self.counters.silence_retries >= self.policy.max_silence_retries
        {
            if state == DialogueState::AwaitingServiceDetails && !input.is_empty() {
                self.collected.already_done_detail = Some(input.raw.trim().to_string());
            }
            return self.close(EndReason::NoResponse);
        }

        if !input.is_empty()
            && input.confidence < self.policy.low_confidence_threshold
            && self.counters.low_confidence_retries < self.policy.max_low_confidence_retries
        {
            self.counters.low_confidence_retries += 1;
            return self.stay(prompts::low_confidence());
        }

        match input.intent {
            Intent::Repeat => {
                let reply = self
                    .ctx
                    .last_system_message
                    .clone()
                    .unwrap_or_else(|| prompts::opening(&self.ctx.customer));
                return self.stay(reply);
            }
            Intent::Confusion => {
                let reply = prompts::clarify(&self.ctx.customer);
                return self.goto(DialogueState::AwaitingInitialDecision, reply);
            }
            Intent::Unclear => return self.reask(),
            _ => {}
        }

        match state {
            DialogueState::AwaitingInitialDecision => self.from_initial(),
            DialogueState::AwaitingReason => self.from_reason(),
            DialogueState::AwaitingReasonPersisted => self.from_reason_persisted(),
            DialogueState::AwaitingDate => self.from_date(),
            DialogueState::AwaitingDateConfirm => self.from_date_confirm(),
            DialogueState::AwaitingBranch => self.from_branch(),
            DialogueState::AwaitingServiceDetails => self.from_service_details(),
            DialogueState::Ended => self.close(EndReason::NoResponse),
        }
    }

    fn from_initial(mut self) -> DialogueAction {
        self.note_branch();
        match self.input.intent {
            Intent::Confirm => self.goto(DialogueState::AwaitingDate, prompts::ask_date()),
            Intent::Reject => self.goto(DialogueState::AwaitingReason, prompts::ask_reason()),
            Intent::AlreadyDone => self.ask_service_details(),
            Intent::ProvideDate => self.date_bearing(prompts::ask_date()),
            Intent::ProvideBranch => match self.collected.branch.clone() {
                Some(branch) => self.goto(
                    DialogueState::AwaitingDate,
                    prompts::branch_noted_ask_date(&branch),
                ),
                None => self.goto(DialogueState::AwaitingDate, prompts::ask_date()),
            },
            intent if intent.is_objection() => self.objection(intent),
            _ => self.reask(),
        }
    }

    fn from_reason(mut self) -> DialogueAction {
        match self.input.intent {
            Intent::Confirm => match self.input.secondary_objection {
                Some(objection) => self.objection(objection),
                None => self.goto(DialogueState::AwaitingDate, prompts::ask_date()),
            },
            Intent::AlreadyDone => self.ask_service_details(),
            Intent::ProvideDate => self.date_bearing(prompts::ask_date()),
            intent if intent.is_objection() => self.objection(intent),
            // a refusal or any other answer is the reason; counter it once
            _ => {
                self.note_reason();
                self.counters.persuasion_count += 1;
                self.goto(DialogueState::AwaitingReasonPersisted, prompts::persuasion())
            }
        }
    }

    fn from_reason_persisted(mut self) -> DialogueAction {
        match self.input.intent {
            Intent::Confirm | Intent::ProvideDate => self.date_bearing(prompts::ask_date()),
            Intent::AlreadyDone => self.ask_service_details(),
            intent if intent.is_objection() => self.objection(intent),
            _ => {
                if self.take_date() {
                    return self.confirm_tentative_date();
                }
                self.note_reason();
                self.close(EndReason::Rejected)
            }
        }
    }

    fn from_date(mut self) -> DialogueAction {
        self.note_branch();
        match self.input.intent {
            Intent::Confirm | Intent::ProvideDate => self.date_bearing(prompts::reprompt_date()),
            Intent::Reject => match self.policy.reject_while_awaiting_date {
                RejectInDatePolicy::EndCall => {
                    self.note_reason();
                    self.close(EndReason::Rejected)
                }
                RejectInDatePolicy::AdvanceToBranch => {
                    self.goto(DialogueState::AwaitingBranch, prompts::ask_branch())
                }
            },
            Intent::AlreadyDone => self.ask_service_details(),
            Intent::ProvideBranch => match self.collected.branch.clone() {
                Some(branch) => self.stay(prompts::branch_noted_ask_date(&branch)),
                None => self.stay(prompts::reprompt_date()),
            },
            intent if intent.is_objection() => {
                self.counters.persuasion_count += 1;
                self.note_objection(intent);
                self.stay(prompts::objection_reply(intent))
            }
            _ => self.stay(prompts::reprompt_date()),
        }
    }

    fn from_date_confirm(mut self) -> DialogueAction {
        self.note_branch();
        match self.input.intent {
            Intent::Confirm => self.accept_date(),
            Intent::Reject => {
                self.collected.clear_date();
                if self.input.postponement {
                    self.goto(
                        DialogueState::AwaitingDate,
                        prompts::objection_reply(Intent::CallLater),
                    )
                } else {
                    self.goto(DialogueState::AwaitingDate, prompts::reopen_date())
                }
            }
            Intent::ProvideDate => {
                if self.input.date_token.is_none() {
                    self.collected.clear_date();
                    return self.goto(DialogueState::AwaitingDate, prompts::reopen_date());
                }
                if self.repeats_tentative_date() {
                    return self.accept_date();
                }
                self.take_date();
                self.confirm_tentative_date()
            }
            intent if intent.is_objection() => {
                self.collected.clear_date();
                self.note_objection(intent);
                self.goto(DialogueState::AwaitingDate, prompts::objection_reply(intent))
            }
            _ => self.reask(),
        }
    }

    fn from_branch(mut self) -> DialogueAction {
        let intent = self.input.intent;
        if intent != Intent::Reject {
            if let Some(branch) = self.input.branch.clone() {
                self.collected.branch = Some(branch);
                return self.close(EndReason::Booked);
            }
        }

        if intent == Intent::Reject && self.collected.has_date() {
            if self.counters.persuasion_count < self.policy.max_persuasion_attempts {
                self.counters.persuasion_count += 1;
                return self.stay(prompts::branch_persuasion());
            }
            return self.close(EndReason::PersuasionExhausted);
        }

        self.stay(prompts::reask_branch())
    }

    fn from_service_details(mut self) -> DialogueAction {
        self.collected.already_done_detail = Some(self.input.raw.trim().to_string());
        self.close(EndReason::AlreadyDone)
    }

    // Shared transitions

    fn objection(mut self, intent: Intent) -> DialogueAction {
        self.counters.persuasion_count += 1;
        self.note_objection(intent);
        self.goto(DialogueState::AwaitingDate, prompts::objection_reply(intent))
    }

    fn ask_service_details(self) -> DialogueAction {
        self.goto(
            DialogueState::AwaitingServiceDetails,
            prompts::ask_service_details(),
        )
    }

    /// Tentative date read back when the utterance carried one; otherwise
    /// wait for a date with `no_token_reply`. Never defaults a date.
    fn date_bearing(mut self, no_token_reply: String) -> DialogueAction {
        if self.take_date() {
            self.confirm_tentative_date()
        } else {
            self.goto(DialogueState::AwaitingDate, no_token_reply)
        }
    }

    fn confirm_tentative_date(self) -> DialogueAction {
        let reply = prompts::confirm_date(self.collected.date_display().unwrap_or_default());
        self.goto(DialogueState::AwaitingDateConfirm, reply)
    }

    /// Date agreed: close when the branch is already known
    fn accept_date(self) -> DialogueAction {
        if self.collected.branch.is_some() {
            self.close(EndReason::Booked)
        } else {
            self.goto(DialogueState::AwaitingBranch, prompts::ask_branch())
        }
    }

    fn reask(self) -> DialogueAction {
        let reply = prompts::reask(
            self.ctx.state(),
            &self.ctx.customer,
            self.collected.date_display(),
        );
        self.stay(reply)
    }

    // Field updates

    fn take_date(&mut self) -> bool {
        match &self.input.date_token {
            Some(token) => {
                self.collected.date_token = Some(token.clone());
                self.collected.resolved_date = self.input.resolved_date.clone();
                true
            }
            None => false,
        }
    }

    fn repeats_tentative_date(&self) -> bool {
        match (&self.input.resolved_date, &self.collected.resolved_date) {
            (Some(new), Some(current)) => new.iso == current.iso,
            _ => self.input.date_token.is_some() && self.input.date_token == self.collected.date_token,
        }
    }

    fn note_branch(&mut self) {
        if self.input.intent == Intent::Reject {
            return;
        }
        if let Some(branch) = &self.input.branch {
            self.collected.branch = Some(branch.clone());
        }
    }

    fn note_reason(&mut self) {
        let raw = self.input.raw.trim();
        if !raw.is_empty() {
            self.collected.rejection_reason = Some(raw.to_string());
        }
    }

    fn note_objection(&mut self, intent: Intent) {
        self.collected
            .rejection_reason
            .get_or_insert_with(|| intent.as_str().to_string());
    }

    // Action builders

    fn stay(self, reply: String) -> DialogueAction {
        let state = self.ctx.state();
        self.goto(state, reply)
    }

    fn goto(self, next_state: DialogueState, reply: String) -> DialogueAction {
        DialogueAction {
            reply,
            next_state,
            end_call: false,
            intent: self.input.intent,
            collected: self.collected,
            counters: self.counters,
            end_reason: None,
            outcome: None,
        }
    }

    fn close(self, reason: EndReason) -> DialogueAction {
        let pre_state = self.ctx.state();
        let outcome = resolve_outcome(
            OutcomeInputs {
                terminating: true,
                pre_state,
                collected: &self.collected,
                intent: self.input.intent,
                end_reason: Some(reason),
            },
            self.policy,
        );
        let reply = self.closing_reply(pre_state, reason);

        DialogueAction {
            reply,
            next_state: DialogueState::Ended,
            end_call: true,
            intent: self.input.intent,
            collected: self.collected,
            counters: self.counters,
            end_reason: Some(reason),
            outcome: Some(outcome),
        }
    }

    fn closing_reply(&self, pre_state: DialogueState, reason: EndReason) -> String {
        if pre_state == DialogueState::AwaitingServiceDetails {
            return prompts::already_done_thanks();
        }
        if reason == EndReason::Rejected {
            return prompts::rejected_goodbye();
        }
        match (self.collected.date_display(), &self.collected.branch) {
            (Some(date), Some(branch)) => prompts::booking_confirmed(date, branch),
            (Some(date), None) => prompts::date_noted_goodbye(date),
            (None, Some(branch)) if reason == EndReason::Booked => {
                prompts::branch_noted_goodbye(branch)
            }
            _ => prompts::no_response_goodbye(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reminder_agent_core::{CallOutcome, CustomerInfo, Utterance};

    fn customer() -> CustomerInfo {
        CustomerInfo {
            customer_name: "Suresh".into(),
            asset_model: "3DX Super".into(),
            asset_id: "HAR3DX1234".into(),
            service_type: "1000 hour".into(),
            due_date: "20 October".into(),
        }
    }

    fn jaipur() -> BranchMatch {
        BranchMatch {
            code: "JPR01".into(),
            name: "Sitapura".into(),
            city: "Jaipur".into(),
            address: "Sitapura Industrial Area".into(),
        }
    }

    fn kal() -> CollectedFields {
        CollectedFields {
            date_token: Some("kal".into()),
            resolved_date: Some(ResolvedDate {
                display: "Saturday, 17 October 2026".into(),
                iso: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            }),
            ..Default::default()
        }
    }

    fn ctx_in(state: DialogueState, collected: CollectedFields) -> CallContext {
        let mut ctx = CallContext::new("call-1", customer());
        ctx.set_opening(prompts::opening(&ctx.customer));
        if state != DialogueState::AwaitingInitialDecision {
            ctx.apply_action(
                &Utterance::new("setup"),
                DialogueAction {
                    reply: "setup".into(),
                    next_state: state,
                    end_call: false,
                    intent: Intent::Confirm,
                    collected,
                    counters: TurnCounters::default(),
                    end_reason: None,
                    outcome: None,
                },
            )
            .unwrap();
        }
        ctx
    }

    fn input(text: &str, intent: Intent) -> TurnInput {
        TurnInput {
            raw: text.into(),
            normalized: text.to_lowercase(),
            confidence: 1.0,
            intent,
            ..Default::default()
        }
    }

    fn dated(text: &str, token: &str) -> TurnInput {
        TurnInput {
            date_token: Some(token.into()),
            resolved_date: Some(ResolvedDate {
                display: "Sunday, 25 October 2026".into(),
                iso: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            }),
            ..input(text, Intent::ProvideDate)
        }
    }

    fn run(ctx: &mut CallContext, input: &TurnInput) -> DialogueAction {
        let action = decide(input, ctx, &DialoguePolicy::default());
        ctx.apply_action(&Utterance::new(input.raw.clone()), action.clone())
            .unwrap();
        action
    }

    #[test]
    fn test_initial_confirm_asks_date() {
        let ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let action = decide(
            &input("haan book kar do", Intent::Confirm),
            &ctx,
            &DialoguePolicy::default(),
        );
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
        assert!(!action.end_call);
        assert_eq!(action.counters.total_turns, 1);
    }

    #[test]
    fn test_initial_date_goes_to_confirm() {
        let ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let action = decide(&dated("25 tarikh", "25 tarikh"), &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDateConfirm);
        assert_eq!(action.collected.date_token.as_deref(), Some("25 tarikh"));
        assert!(action.reply.contains("25 October"));
    }

    #[test]
    fn test_initial_objection_replies_and_counts() {
        let ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let action = decide(
            &input("driver nahi hai", Intent::DriverUnavailable),
            &ctx,
            &DialoguePolicy::default(),
        );
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
        assert_eq!(action.counters.persuasion_count, 1);
        assert_eq!(action.collected.rejection_reason.as_deref(), Some("driver_unavailable"));
        assert_eq!(action.reply, prompts::objection_reply(Intent::DriverUnavailable));
    }

    #[test]
    fn test_initial_branch_kept_for_later() {
        let mut ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let mut branch_input = input("jaipur", Intent::ProvideBranch);
        branch_input.branch = Some(jaipur());
        let action = run(&mut ctx, &branch_input);
        assert_eq!(action.next_state, DialogueState::AwaitingDate);

        run(&mut ctx, &dated("25 tarikh", "25 tarikh"));
        assert_eq!(ctx.state(), DialogueState::AwaitingDateConfirm);

        let action = run(&mut ctx, &input("haan", Intent::Confirm));
        assert!(action.end_call);
        assert_eq!(action.end_reason, Some(EndReason::Booked));
        assert_eq!(ctx.outcome(), Some(CallOutcome::Confirmed));
    }

    #[test]
    fn test_reject_twice_ends_rejected() {
        let mut ctx = ctx_in(DialogueState::AwaitingReason, Default::default());
        let first = run(&mut ctx, &input("nahi chahiye", Intent::Reject));
        assert_eq!(first.next_state, DialogueState::AwaitingReasonPersisted);
        assert_eq!(first.reply, prompts::persuasion());

        let second = run(&mut ctx, &input("nahi", Intent::Reject));
        assert!(second.end_call);
        assert_eq!(second.outcome, Some(CallOutcome::Rejected));
        assert_eq!(ctx.state(), DialogueState::Ended);
        assert_eq!(ctx.collected.rejection_reason.as_deref(), Some("nahi"));
    }

    #[test]
    fn test_persisted_reject_with_date_goes_to_confirm() {
        let ctx = ctx_in(DialogueState::AwaitingReasonPersisted, Default::default());
        let mut turn = dated("nahi, 25 tarikh ko", "25 tarikh");
        turn.intent = Intent::Reject;
        let action = decide(&turn, &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDateConfirm);
        assert!(!action.end_call);
    }

    #[test]
    fn test_reason_confirm_with_objection_routes_to_objection() {
        let ctx = ctx_in(DialogueState::AwaitingReason, Default::default());
        let mut turn = input("haan par paise nahi hai", Intent::Confirm);
        turn.secondary_objection = Some(Intent::MoneyIssue);
        let action = decide(&turn, &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
        assert_eq!(action.reply, prompts::objection_reply(Intent::MoneyIssue));
    }

    #[test]
    fn test_reject_in_date_follows_policy() {
        let ctx = ctx_in(DialogueState::AwaitingDate, Default::default());
        let turn = input("nahi", Intent::Reject);

        let action = decide(&turn, &ctx, &DialoguePolicy::default());
        assert!(action.end_call);
        assert_eq!(action.outcome, Some(CallOutcome::Rejected));

        let advance = DialoguePolicy {
            reject_while_awaiting_date: RejectInDatePolicy::AdvanceToBranch,
            ..Default::default()
        };
        let action = decide(&turn, &ctx, &advance);
        assert_eq!(action.next_state, DialogueState::AwaitingBranch);
    }

    #[test]
    fn test_confirm_without_date_reprompts() {
        let ctx = ctx_in(DialogueState::AwaitingDate, Default::default());
        let action = decide(&input("haan", Intent::Confirm), &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
        assert_eq!(action.reply, prompts::reprompt_date());
        assert!(!action.collected.has_date());
    }

    #[test]
    fn test_date_confirm_reject_reopens() {
        let ctx = ctx_in(DialogueState::AwaitingDateConfirm, kal());
        let action = decide(&input("nahi", Intent::Reject), &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
        assert!(!action.collected.has_date());
        assert_eq!(action.reply, prompts::reopen_date());

        let mut later = input("nahi abhi nahi baad mein", Intent::Reject);
        later.postponement = true;
        let action = decide(&later, &ctx, &DialoguePolicy::default());
        assert_eq!(action.reply, prompts::objection_reply(Intent::CallLater));
    }

    #[test]
    fn test_date_confirm_new_date_replaces() {
        let ctx = ctx_in(DialogueState::AwaitingDateConfirm, kal());
        let action = decide(&dated("25 tarikh", "25 tarikh"), &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingDateConfirm);
        assert_eq!(action.collected.date_token.as_deref(), Some("25 tarikh"));
    }

    #[test]
    fn test_date_confirm_same_date_accepts() {
        let ctx = ctx_in(DialogueState::AwaitingDateConfirm, kal());
        let mut turn = input("haan kal", Intent::ProvideDate);
        turn.date_token = Some("kal".into());
        turn.resolved_date = kal().resolved_date;
        let action = decide(&turn, &ctx, &DialoguePolicy::default());
        assert_eq!(action.next_state, DialogueState::AwaitingBranch);
    }

    #[test]
    fn test_branch_match_confirms() {
        let ctx = ctx_in(DialogueState::AwaitingBranch, kal());
        let mut turn = input("जयपुर", Intent::ProvideBranch);
        turn.branch = Some(jaipur());
        let action = decide(&turn, &ctx, &DialoguePolicy::default());
        assert!(action.end_call);
        assert_eq!(action.next_state, DialogueState::Ended);
        assert_eq!(action.outcome, Some(CallOutcome::Confirmed));
        assert_eq!(action.collected.branch.unwrap().code, "JPR01");
    }

    #[test]
    fn test_branch_reject_persuades_then_closes() {
        let mut ctx = ctx_in(DialogueState::AwaitingBranch, kal());
        let turn = input("nahi", Intent::Reject);

        for _ in 0..DialoguePolicy::default().max_persuasion_attempts {
            let action = run(&mut ctx, &turn);
            assert_eq!(action.reply, prompts::branch_persuasion());
            assert!(!action.end_call);
        }
        let action = run(&mut ctx, &turn);
        assert_eq!(action.end_reason, Some(EndReason::PersuasionExhausted));
        // date alone is actionable
        assert_eq!(action.outcome, Some(CallOutcome::Confirmed));
    }

    #[test]
    fn test_service_details_captured_verbatim() {
        let ctx = ctx_in(DialogueState::AwaitingServiceDetails, Default::default());
        let action = decide(
            &input("pichhle hafte jaipur mein karwa li", Intent::Unknown),
            &ctx,
            &DialoguePolicy::default(),
        );
        assert!(action.end_call);
        assert_eq!(action.outcome, Some(CallOutcome::AlreadyDone));
        assert_eq!(
            action.collected.already_done_detail.as_deref(),
            Some("pichhle hafte jaipur mein karwa li")
        );
    }

    #[test]
    fn test_three_empty_turns_end_no_response() {
        let mut ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let silence = input("", Intent::Unclear);
        let first = run(&mut ctx, &silence);
        let second = run(&mut ctx, &silence);
        assert!(!first.end_call && !second.end_call);
        assert_eq!(second.next_state, DialogueState::AwaitingInitialDecision);

        let third = run(&mut ctx, &silence);
        assert!(third.end_call);
        assert_eq!(third.outcome, Some(CallOutcome::NoResponse));
        assert_eq!(ctx.counters.silence_retries, 3);
    }

    #[test]
    fn test_unknown_streak_resets_on_answer() {
        let mut ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        run(&mut ctx, &input("asdf", Intent::Unknown));
        run(&mut ctx, &input("qwerty", Intent::Unknown));
        let action = run(&mut ctx, &input("samajh nahi aaya", Intent::Confusion));
        assert_eq!(action.counters.unknown_streak, 0);
        assert_eq!(action.reply, prompts::clarify(&ctx.customer));
    }

    #[test]
    fn test_repeat_reemits_last_message() {
        let ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let action = decide(&input("phir se bolo", Intent::Repeat), &ctx, &DialoguePolicy::default());
        assert_eq!(Some(action.reply), ctx.last_system_message);
        assert_eq!(action.next_state, DialogueState::AwaitingInitialDecision);
    }

    #[test]
    fn test_confusion_resets_to_initial() {
        let ctx = ctx_in(DialogueState::AwaitingDate, Default::default());
        let action = decide(
            &input("aap kaun bol rahe ho", Intent::Confusion),
            &ctx,
            &DialoguePolicy::default(),
        );
        assert_eq!(action.next_state, DialogueState::AwaitingInitialDecision);
    }

    #[test]
    fn test_low_confidence_reasks_until_budget() {
        let mut ctx = ctx_in(DialogueState::AwaitingInitialDecision, Default::default());
        let mut mumble = input("haan", Intent::Confirm);
        mumble.confidence = 0.1;

        for _ in 0..DialoguePolicy::default().max_low_confidence_retries {
            let action = run(&mut ctx, &mumble);
            assert_eq!(action.reply, prompts::low_confidence());
            assert_eq!(action.next_state, DialogueState::AwaitingInitialDecision);
        }
        let action = run(&mut ctx, &mumble);
        assert_eq!(action.next_state, DialogueState::AwaitingDate);
    }

    #[test]
    fn test_turn_cap_closes() {
        let policy = DialoguePolicy {
            max_turns: 2,
            ..Default::default()
        };
        let mut ctx = ctx_in(DialogueState::AwaitingDate, Default::default());
        let turn = input("machine site pe hai", Intent::MachineBusy);
        let action = decide(&turn, &ctx, &policy);
        assert!(!action.end_call);
        ctx.apply_action(&Utterance::new("machine site pe hai"), action)
            .unwrap();

        let action = decide(&turn, &ctx, &policy);
        assert!(action.end_call);
        assert_eq!(action.end_reason, Some(EndReason::TurnCap));
        assert_eq!(action.outcome, Some(CallOutcome::NoResponse));
    }

    #[test]
    fn test_ended_is_absorbing() {
        let mut ctx = ctx_in(DialogueState::AwaitingServiceDetails, Default::default());
        run(&mut ctx, &input("ho gayi", Intent::Unknown));
        assert!(ctx.is_ended());

        for intent in Intent::ALL {
            let action = decide(&input("haan", intent), &ctx, &DialoguePolicy::default());
            assert_eq!(action.next_state, DialogueState::Ended);
            assert!(action.end_call);
            assert_eq!(action.outcome, Some(CallOutcome::AlreadyDone));
        }
    }
}
