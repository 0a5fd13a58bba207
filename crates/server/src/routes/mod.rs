//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness
//! GET    /health/ready            - Readiness (store ping)
//!
//! # Records ({collection} = students | staff | employees)
//! GET    /api/{collection}        - List
//! POST   /api/{collection}        - Create
//! GET    /api/{collection}/{id}   - Detail
//! PUT    /api/{collection}/{id}   - Full update
//! PATCH  /api/{collection}/{id}   - Partial update
//! DELETE /api/{collection}/{id}   - Delete
//!
//! # PDF
//! POST   /api/upload-pdf          - Ingest tables into records
//! POST   /upload-pdf              - Page text only
//!
//! # Dashboard
//! GET    /api/stats               - Aggregates
//! ```

pub mod records;
pub mod stats;
pub mod upload;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::models::{Employee, Staff, Student};
use crate::state::AppState;

/// Create the record routes router.
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .merge(records::resource::<Student>())
        .merge(records::resource::<Staff>())
        .merge(records::resource::<Employee>())
}

/// Create the upload routes router.
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload-pdf", post(upload::upload_pdf))
        .route("/upload-pdf", post(upload::page_text))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Build the full application router with state applied.
///
/// Tracing, path normalization and Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(record_routes())
        .merge(upload_routes(max_upload_bytes))
        .route("/api/stats", get(stats::show))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
