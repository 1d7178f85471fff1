//! Router construction for the API.

use std::sync::Arc;

use axum::{Router, http::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::health::health;
use crate::state::ApiState;
use crate::vaults::{create_vault, get_vault, list_vaults};

/// Build the application router over shared state.
///
/// This is the in-process request handler the HTTP test client binds to; the
/// binary serves the same router over a TCP listener.
#[must_use]
pub fn router(state: ApiState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            route = %request.uri().path(),
        )
    });

    Router::new()
        .route("/health", get(health))
        .route("/vaults", get(list_vaults).post(create_vault))
        .route("/vaults/{id}", get(get_vault))
        .layer(trace_layer)
        .with_state(Arc::new(state))
}
