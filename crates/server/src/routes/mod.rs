//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (store reachable)
//!
//! # Products
//! POST   /api/v1/products        - Create (201 + document)
//! GET    /api/v1/products        - List (bare array)
//! GET    /api/v1/products/{id}   - Show (200 + document, 404)
//! PUT    /api/v1/products/{id}   - Replace (200 + document, 404)
//! DELETE /api/v1/products/{id}   - Delete (204, 404)
//! ```

pub mod health;
pub mod products;

use std::time::Duration;

use axum::{Router, middleware, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::panic_response;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/v1/products", product_routes())
}

/// Build the complete application with request tracing.
///
/// A panicking handler answers with a JSON-API 500 that still carries the
/// request id. Sentry layers are added by the binary on top of this router.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
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
