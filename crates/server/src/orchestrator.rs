//! Turn orchestration
//!
//! The only place side effects happen: it looks up the session, runs the
//! pure engine under the session lock, applies the returned action, and
//! finishes the call when the action (or an error) ends it. Every error is
//! turned into a spoken reply that hangs up; nothing reaches the telephony
//! side raw.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use reminder_agent_agent::{prompts, TurnEngine};
use reminder_agent_core::{CallContext, CallError, CallOutcome, Intent, Utterance};
use reminder_agent_persistence::PendingCallDirectory;
use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::session::SessionManager;

/// One customer turn as delivered by the telephony side
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TurnRequest {
    #[serde(default, alias = "callId")]
    pub call_id: Option<String>,
    #[serde(default, alias = "transcribedText")]
    pub transcribed_text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// What to say and whether to keep the line open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub speak_text: String,
    pub continue_listening: bool,
    pub hangup: bool,
}

impl TurnResponse {
    pub fn listen(speak_text: impl Into<String>) -> Self {
        Self {
            speak_text: speak_text.into(),
            continue_listening: true,
            hangup: false,
        }
    }

    pub fn hangup(speak_text: impl Into<String>) -> Self {
        Self {
            speak_text: speak_text.into(),
            continue_listening: false,
            hangup: true,
        }
    }

    fn from_error(err: &CallError) -> Self {
        match err {
            CallError::NoActiveSession(_) | CallError::SessionEnded(_) => {
                Self::hangup(prompts::session_expired())
            }
            _ => Self::hangup(prompts::technical_error()),
        }
    }
}

/// Result of one applied turn
struct AppliedTurn {
    reply: String,
    intent: Intent,
    end_call: bool,
}

pub struct CallOrchestrator {
    engine: Arc<dyn TurnEngine>,
    sessions: Arc<SessionManager>,
    pending: Arc<dyn PendingCallDirectory>,
}

impl CallOrchestrator {
    pub fn new(
        engine: Arc<dyn TurnEngine>,
        sessions: Arc<SessionManager>,
        pending: Arc<dyn PendingCallDirectory>,
    ) -> Self {
        Self {
            engine,
            sessions,
            pending,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Call start: consume the pending entry, create the session and return
    /// the opening line
    pub async fn start_call(&self, call_id: Option<&str>) -> TurnResponse {
        match self.try_start(call_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(call_id = ?call_id, error = %e, "Call start failed");
                TurnResponse::from_error(&e)
            }
        }
    }

    async fn try_start(&self, call_id: Option<&str>) -> Result<TurnResponse, CallError> {
        let call_id = required_call_id(call_id)?;

        if let Some(existing) = self.sessions.get(call_id) {
            let ctx = existing.lock();
            let reply = ctx
                .last_system_message
                .clone()
                .unwrap_or_else(|| self.engine.opening(&ctx.customer));
            tracing::debug!(call_id, "Start for an active call, repeating last message");
            return Ok(TurnResponse::listen(reply));
        }

        let customer = self
            .pending
            .take(call_id)
            .await?
            .ok_or_else(|| CallError::NoPendingCallData(call_id.to_string()))?;

        let mut ctx = CallContext::new(call_id, customer);
        let opening = self.engine.opening(&ctx.customer);
        ctx.set_opening(opening.clone());
        self.sessions.insert(ctx);
        metrics::record_call_started();

        Ok(TurnResponse::listen(opening))
    }

    /// Process one customer turn
    pub async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        match self.try_turn(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(call_id = ?request.call_id, error = %e, "Turn failed");
                TurnResponse::from_error(&e)
            }
        }
    }

    async fn try_turn(&self, request: &TurnRequest) -> Result<TurnResponse, CallError> {
        let call_id = required_call_id(request.call_id.as_deref())?;
        let session = self
            .sessions
            .get(call_id)
            .ok_or_else(|| CallError::NoActiveSession(call_id.to_string()))?;

        let utterance = Utterance::with_confidence(
            request.transcribed_text.clone().unwrap_or_default(),
            request.confidence,
        );

        let started = Instant::now();
        let applied = {
            let mut ctx = session.lock();
            self.apply_turn(&mut ctx, &utterance)
        };

        match applied {
            Ok(turn) => {
                metrics::record_turn(turn.intent, started.elapsed().as_secs_f64());
                tracing::info!(
                    call_id,
                    intent = %turn.intent,
                    end_call = turn.end_call,
                    "Turn processed"
                );

                if turn.end_call {
                    self.sessions.finish(call_id, CallOutcome::NoResponse).await;
                    Ok(TurnResponse::hangup(turn.reply))
                } else {
                    Ok(TurnResponse::listen(turn.reply))
                }
            }
            Err(err @ CallError::Classification(_)) => {
                self.sessions.finish(call_id, CallOutcome::NoResponse).await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Decide and apply under the session lock. A panic inside the pure
    /// pipeline ends the call instead of unwinding into the server.
    fn apply_turn(
        &self,
        ctx: &mut CallContext,
        utterance: &Utterance,
    ) -> Result<AppliedTurn, CallError> {
        if ctx.is_ended() {
            return Err(CallError::SessionEnded(ctx.call_id.clone()));
        }

        let engine = &self.engine;
        let decided = catch_unwind(AssertUnwindSafe(|| engine.process(ctx, utterance)));
        let action = match decided {
            Ok(action) => action,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(call_id = %ctx.call_id, error = %message, "Turn pipeline panicked");
                ctx.force_end(CallOutcome::NoResponse);
                return Err(CallError::Classification(message));
            }
        };

        let turn = AppliedTurn {
            reply: action.reply.clone(),
            intent: action.intent,
            end_call: action.end_call,
        };
        ctx.apply_action(utterance, action)?;
        Ok(turn)
    }

    /// Terminal status from the telephony side (hangup, failure). An open
    /// call is ended as `no_response`, the same path as the TTL sweep.
    pub async fn handle_status(&self, call_id: &str, terminal_status_code: &str) -> bool {
        let call_id = call_id.trim();
        let finished = self.sessions.finish(call_id, CallOutcome::NoResponse).await;
        tracing::info!(
            call_id,
            status = terminal_status_code,
            finished,
            "Terminal status received"
        );
        finished
    }
}

fn required_call_id(call_id: Option<&str>) -> Result<&str, CallError> {
    call_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(CallError::MissingCallIdentifier)
}
