//! Shopping-list optimization.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use findmystore_core::SessionId;
use serde::Deserialize;
use uuid::Uuid;

use super::{StoreScope, refresh_stores};
use crate::error::AppError;
use crate::services::optimizer::ShoppingListOutcome;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/sessions/{session_id}/shopping-list",
        post(optimize_list),
    )
}

#[derive(Debug, Deserialize)]
pub struct ShoppingListRequest {
    pub items: Vec<String>,
    #[serde(flatten)]
    pub scope: StoreScope,
}

/// Plan the cheapest set of store visits for a shopping list.
///
/// # Errors
///
/// Returns an error for an unknown session, invalid scope, or a failed Maps lookup.
pub async fn optimize_list(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ShoppingListRequest>,
) -> Result<Json<ShoppingListOutcome>, AppError> {
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    refresh_stores(&state, &mut session, &body.scope).await?;
    Ok(Json(session.optimize(&body.items)))
}
