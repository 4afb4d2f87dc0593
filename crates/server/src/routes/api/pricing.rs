//! Cheapest-offer search and price comparison.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use findmystore_core::SessionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StoreScope, refresh_stores, require_product};
use crate::error::AppError;
use crate::services::pricing::{self, CheapestOffer, ComparisonRow, PriceComparison};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/{session_id}/cheapest", get(find_cheapest))
        .route("/api/sessions/{session_id}/compare", post(compare_prices))
}

#[derive(Debug, Deserialize)]
pub struct CheapestParams {
    pub product: String,
    pub max_price: Option<Decimal>,
}

/// Either the best offer or a not-found message.
#[derive(Debug, Serialize)]
pub struct CheapestResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<CheapestOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Cheapest in-stock offer in the session's search space.
///
/// # Errors
///
/// Returns an error for an unknown session or a blank product.
pub async fn find_cheapest(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<CheapestParams>,
) -> Result<Json<CheapestResponse>, AppError> {
    let product = require_product(&params.product)?;
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    let offer = session.find_cheapest(product, params.max_price);
    Ok(Json(CheapestResponse {
        found: offer.is_some(),
        message: offer.is_none().then(|| pricing::not_found_message(product)),
        offer,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub product: String,
    #[serde(flatten)]
    pub scope: StoreScope,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    #[serde(flatten)]
    pub comparison: PriceComparison,
    pub cheapest: Option<ComparisonRow>,
}

/// Compare a product across every store, refreshing the store set first when
/// a city is given.
///
/// # Errors
///
/// Returns an error for an unknown session, invalid input, or a failed Maps lookup.
pub async fn compare_prices(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    let product = require_product(&body.product)?;
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    refresh_stores(&state, &mut session, &body.scope).await?;
    let comparison = session.compare_prices(product);
    let cheapest = comparison.cheapest().cloned();

    Ok(Json(CompareResponse {
        comparison,
        cheapest,
    }))
}
