//! Integration test support for FindMyStore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p findmystore-integration-tests
//! ```
//!
//! No API keys are needed: the router is built from
//! [`FinderConfig::default`], which searches the built-in demo stores and
//! leaves the chat assistant unconfigured. Inventory is seeded so generated
//! stock is stable within a run.
//!
//! # Test Categories
//!
//! - `http_api` - JSON API driven through the axum router with `oneshot`
//! - `shopping_plan` - Greedy shopping-list planning
//! - `session_flow` - Store fetch, restock and alert flows on a session

#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use findmystore_core::{Category, GeoPoint, Store, StoreId};
use findmystore_server::{AppState, FinderConfig, routes};
use serde_json::Value;
use tower::ServiceExt;

/// Seed used for every test session's generated inventory.
pub const TEST_INVENTORY_SEED: u64 = 7;

/// Offline configuration with seeded inventory.
#[must_use]
pub fn test_config() -> FinderConfig {
    FinderConfig {
        inventory_seed: Some(TEST_INVENTORY_SEED),
        ..FinderConfig::default()
    }
}

/// The full application router over offline state.
#[must_use]
pub fn test_app() -> Router {
    let state = AppState::new(test_config()).expect("offline state needs no clients");
    routes::app(state)
}

/// Send a request and decode the body as JSON (or a JSON string for plain
/// text bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Create a session and return its ID.
pub async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"]
        .as_str()
        .expect("session_id string")
        .to_string()
}

/// Grocery store with the given ID, for building store sets by hand.
#[must_use]
pub fn grocery_store(id: i32, name: &str) -> Store {
    Store {
        id: StoreId::new(id),
        place_id: None,
        name: name.to_string(),
        city: "Hyderabad".to_string(),
        category: Category::Grocery,
        location: GeoPoint::new(17.43, 78.41),
        rating: 4.4,
        verified: true,
        hours: "8am-10pm".to_string(),
        address: String::new(),
    }
}
