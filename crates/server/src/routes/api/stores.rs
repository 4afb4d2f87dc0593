//! Store search, stock lookups and directions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use findmystore_core::{SessionId, Store, StoreId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_category, require_product};
use crate::error::AppError;
use crate::services::inventory::StockInfo;
use crate::services::registry::{DEFAULT_RADIUS_KM, StoreQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/{session_id}/stores", get(list_stores))
        .route(
            "/api/sessions/{session_id}/stores/{store_id}/stock",
            get(check_stock),
        )
        .route(
            "/api/sessions/{session_id}/stores/{store_id}/directions",
            get(directions),
        )
}

#[derive(Debug, Deserialize)]
pub struct StoresParams {
    pub city: Option<String>,
    pub category: Option<String>,
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub open_now: bool,
}

#[derive(Debug, Serialize)]
pub struct StoresResponse {
    pub count: usize,
    pub stores: Vec<Store>,
}

/// Search for stores and make them the session's current store set.
///
/// # Errors
///
/// Returns an error for an unknown session or category, or a failed Maps lookup.
pub async fn list_stores(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<StoresParams>,
) -> Result<Json<StoresResponse>, AppError> {
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    let city = params
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.config().default_city);
    let query = StoreQuery::new(city)
        .with_category(parse_category(params.category.as_deref())?)
        .with_radius_km(params.radius_km.unwrap_or(DEFAULT_RADIUS_KM))
        .with_open_now(params.open_now);

    let stores = session.fetch_stores(state.directory(), &query).await?;
    Ok(Json(StoresResponse {
        count: stores.len(),
        stores,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StockParams {
    pub product: String,
}

/// Stock and price of a product at one store.
///
/// # Errors
///
/// Returns an error for an unknown session or a blank product.
pub async fn check_stock(
    State(state): State<AppState>,
    Path((session_id, store_id)): Path<(Uuid, i32)>,
    Query(params): Query<StockParams>,
) -> Result<Json<StockInfo>, AppError> {
    let product = require_product(&params.product)?;
    let session = state.session(SessionId::from(session_id)).await?;
    let mut session = session.lock().await;

    Ok(Json(session.check_stock(StoreId::new(store_id), product)))
}

#[derive(Debug, Deserialize)]
pub struct DirectionsParams {
    pub origin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub store_id: StoreId,
    pub link: String,
}

/// Google Maps driving directions to a store.
///
/// # Errors
///
/// Returns `NotFound` for an unknown session or a store outside the search space.
pub async fn directions(
    State(state): State<AppState>,
    Path((session_id, store_id)): Path<(Uuid, i32)>,
    Query(params): Query<DirectionsParams>,
) -> Result<Json<DirectionsResponse>, AppError> {
    let store_id = StoreId::new(store_id);
    let session = state.session(SessionId::from(session_id)).await?;
    let session = session.lock().await;

    let link = session
        .directions(store_id, params.origin.as_deref())
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;
    Ok(Json(DirectionsResponse { store_id, link }))
}
