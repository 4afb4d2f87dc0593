//! Chat with the shopping assistant.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use findmystore_core::SessionId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::agent::AgentService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions/{session_id}/chat", post(send_message))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Send a message to the assistant.
///
/// Agent failures are returned as an `Agent error: ...` reply, not as an
/// HTTP error.
///
/// # Errors
///
/// Returns an error for an unknown session or an empty message.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    let config = state.config();
    let agent = AgentService::new(
        state.claude(),
        state.directory(),
        &config.default_city,
        config.currency,
    );
    let reply = agent.run(&mut session, message).await;

    Ok(Json(ChatReply { reply }))
}
