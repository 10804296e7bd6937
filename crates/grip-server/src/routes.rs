use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use grip_core::{RequestEnvelope, ResponseEnvelope};
use serde_json::{json, Value};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn skill_routes() -> Router<AppState> {
    Router::new().route("/skill", post(handle_skill))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// Parse the body ourselves so malformed envelopes get the JSON error shape
/// instead of axum's plain-text rejection.
async fn handle_skill(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let envelope: RequestEnvelope = serde_json::from_slice(&body)?;
    tracing::debug!(
        session_id = %envelope.session.session_id,
        request_id = %envelope.request.request_id,
        "skill request received"
    );
    Ok(Json(state.dispatcher.handle(envelope).await))
}
