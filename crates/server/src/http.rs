//! HTTP Endpoints
//!
//! Thin JSON surface for the telephony and dialer collaborators.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use reminder_agent_core::CustomerInfo;

use crate::orchestrator::{TurnRequest, TurnResponse};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        // Call lifecycle (telephony side)
        .route("/api/calls/start", post(start_call))
        .route("/api/calls/turn", post(turn))
        .route("/api/calls/status", post(status))
        .route("/api/calls", get(list_calls))
        .route("/api/calls/:id", get(get_call))
        // Dialer side
        .route("/api/pending-calls", post(register_pending_call))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false or no origin is configured, returns a
///   permissive layer (development)
/// - Otherwise only the configured origins are allowed
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled || origins.is_empty() {
        tracing::warn!("CORS restriction off - allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

#[derive(Debug, Deserialize)]
struct StartCallRequest {
    #[serde(default, alias = "callId")]
    call_id: Option<String>,
}

async fn start_call(
    State(state): State<AppState>,
    Json(request): Json<StartCallRequest>,
) -> Json<TurnResponse> {
    Json(
        state
            .orchestrator
            .start_call(request.call_id.as_deref())
            .await,
    )
}

async fn turn(State(state): State<AppState>, Json(request): Json<TurnRequest>) -> Json<TurnResponse> {
    Json(state.orchestrator.handle_turn(request).await)
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    #[serde(alias = "callId")]
    call_id: String,
    #[serde(default, alias = "terminalStatusCode")]
    terminal_status_code: String,
}

/// Terminal status signal. Idempotent: an already finished call is a no-op.
async fn status(State(state): State<AppState>, Json(request): Json<StatusRequest>) -> StatusCode {
    state
        .orchestrator
        .handle_status(&request.call_id, &request.terminal_status_code)
        .await;
    StatusCode::NO_CONTENT
}

async fn list_calls(State(state): State<AppState>) -> Json<serde_json::Value> {
    let calls = state.sessions.list();
    Json(serde_json::json!({
        "calls": calls,
        "count": calls.len(),
    }))
}

async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::NotFound(format!("call {id}")))?;
    let ctx = session.lock();

    Ok(Json(serde_json::json!({
        "call_id": ctx.call_id,
        "state": ctx.state(),
        "collected": ctx.collected,
        "counters": ctx.counters,
        "turn_count": ctx.turns().len(),
        "age_seconds": session.age().as_secs(),
    })))
}

#[derive(Debug, Deserialize)]
struct RegisterPendingCallRequest {
    #[serde(default, alias = "callId")]
    call_id: Option<String>,
    #[serde(flatten)]
    customer: CustomerInfo,
}

#[derive(Debug, Serialize)]
struct RegisterPendingCallResponse {
    call_id: String,
}

/// Register a call the dialer is about to place. A missing id is generated;
/// ids are trimmed the same way call start trims them.
async fn register_pending_call(
    State(state): State<AppState>,
    Json(request): Json<RegisterPendingCallRequest>,
) -> Result<(StatusCode, Json<RegisterPendingCallResponse>), ServerError> {
    if request.customer.customer_name.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "customer_name is required".to_string(),
        ));
    }

    let call_id = request
        .call_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    state.pending.register(&call_id, request.customer).await?;
    tracing::info!(call_id = %call_id, "Pending call registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterPendingCallResponse { call_id }),
    ))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let pending = state.pending.pending_count().await.ok();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "active_calls": state.sessions.count(),
        "pending_calls": pending,
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
