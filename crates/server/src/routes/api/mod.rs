//! JSON API handlers.
//!
//! Every finder endpoint is scoped to a session created with
//! `POST /api/sessions`. Requests within one session are serialized.

pub mod alerts;
pub mod chat;
pub mod pricing;
pub mod sessions;
pub mod shopping;
pub mod stores;

use axum::Router;
use findmystore_core::Category;
use serde::Deserialize;

use crate::error::AppError;
use crate::services::registry::{DEFAULT_RADIUS_KM, StoreQuery};
use crate::services::session::FinderSession;
use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(sessions::router())
        .merge(stores::router())
        .merge(pricing::router())
        .merge(shopping::router())
        .merge(alerts::router())
        .merge(chat::router())
}

/// Optional store search that refreshes the session's store set before an
/// operation runs.
#[derive(Debug, Default, Deserialize)]
pub struct StoreScope {
    pub city: Option<String>,
    pub category: Option<String>,
    pub radius_km: Option<f64>,
}

impl StoreScope {
    /// Store query for this scope, if a city was given.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an unknown category.
    pub fn query(&self) -> Result<Option<StoreQuery>, AppError> {
        let Some(city) = non_empty(self.city.as_deref()) else {
            return Ok(None);
        };
        Ok(Some(
            StoreQuery::new(city)
                .with_category(parse_category(self.category.as_deref())?)
                .with_radius_km(self.radius_km.unwrap_or(DEFAULT_RADIUS_KM)),
        ))
    }
}

/// Refresh the session's store set when the scope names a city.
///
/// # Errors
///
/// Returns an error for an invalid scope or a failed Maps lookup.
pub async fn refresh_stores(
    state: &AppState,
    session: &mut FinderSession,
    scope: &StoreScope,
) -> Result<(), AppError> {
    if let Some(query) = scope.query()? {
        session.fetch_stores(state.directory(), &query).await?;
    }
    Ok(())
}

/// Parse an optional category name.
///
/// # Errors
///
/// Returns `BadRequest` for an unknown category.
pub fn parse_category(category: Option<&str>) -> Result<Option<Category>, AppError> {
    non_empty(category)
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Require a non-blank product name.
///
/// # Errors
///
/// Returns `BadRequest` if the name is blank.
pub fn require_product(product: &str) -> Result<&str, AppError> {
    non_empty(Some(product)).ok_or_else(|| AppError::BadRequest("product is required".to_string()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
