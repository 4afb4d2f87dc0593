//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                              - Liveness check
//!
//! POST /api/sessions                                        - Create a session
//! GET  /api/sessions/{id}/stores                            - Search stores (replaces store set)
//! GET  /api/sessions/{id}/stores/{store_id}/stock           - Stock and price of a product
//! GET  /api/sessions/{id}/stores/{store_id}/directions      - Driving directions link
//! GET  /api/sessions/{id}/cheapest                          - Cheapest in-stock offer
//! POST /api/sessions/{id}/compare                           - Per-store price comparison
//! POST /api/sessions/{id}/shopping-list                     - Multi-store shopping plan
//! POST /api/sessions/{id}/alerts                            - Subscribe to restock alerts
//! POST /api/sessions/{id}/restock                           - Simulate a restock
//! POST /api/sessions/{id}/chat                              - Talk to the assistant
//! ```

pub mod api;

use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// All routes, without state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(api::router())
}

/// The application router with request tracing and state attached.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::FinderConfig;

    fn app_for_test() -> Router {
        app(AppState::new(FinderConfig::default()).expect("offline state"))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app_for_test()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64)
            .await
            .expect("body");
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app_for_test()
            .oneshot(Request::get("/api/nope").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
