//! Ironyard storefront library.
//!
//! JSON API for catalog browsing, the session-backed cart and order
//! requests. The binary in `main.rs` wires this router to `PostgreSQL`,
//! Sentry and a TCP listener; tests drive [`app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// `session_store` backs the cart; production passes the `PostgreSQL` store,
/// tests an in-memory one.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::session_layer(session_store, state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
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
