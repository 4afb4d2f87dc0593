//! Restock alerts (demo).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use findmystore_core::{SessionId, StoreId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_product;
use crate::error::AppError;
use crate::services::alerts::RestockReport;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/{session_id}/alerts", post(subscribe))
        .route("/api/sessions/{session_id}/restock", post(restock))
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub product: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Subscribe to restock alerts for a product.
///
/// # Errors
///
/// Returns an error for an unknown session or a blank product.
pub async fn subscribe(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SubscribeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let product = require_product(&body.product)?;
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    Ok(Json(MessageResponse {
        message: session.subscribe(product, &body.city),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub product: String,
    pub store_id: StoreId,
    pub quantity: Option<u32>,
}

/// Simulate a restock and report how many alerts would fire.
///
/// # Errors
///
/// Returns an error for an unknown session or a blank product.
pub async fn restock(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<RestockRequest>,
) -> Result<Json<RestockReport>, AppError> {
    let product = require_product(&body.product)?;
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    Ok(Json(session.simulate_restock(product, body.store_id, body.quantity)))
}
