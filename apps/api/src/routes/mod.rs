pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::MAX_UPLOAD_BYTES;
use crate::extract::handlers::handle_extract_text;
use crate::generation::handlers::handle_generate_cover_letter;
use crate::state::AppState;

/// Builds the API router.
///
/// Bodies over `MAX_UPLOAD_BYTES` are refused up front when Content-Length
/// says so, and cut off while streaming otherwise. At most
/// `max_concurrent_requests` requests are in flight across all routes; the
/// rest wait for a slot.
pub fn build_router(state: AppState) -> Router {
    let max_in_flight = state.config.max_concurrent_requests;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/extract-text", post(handle_extract_text))
        .route(
            "/api/generate-cover-letter",
            post(handle_generate_cover_letter),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(GlobalConcurrencyLimitLayer::new(max_in_flight))
        .with_state(state)
}
