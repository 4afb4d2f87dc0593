//! Session creation.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use findmystore_core::SessionId;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions", post(create_session))
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
}

/// Start a new finder session.
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let (session_id, _) = state.sessions().create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}
