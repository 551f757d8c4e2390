//! Route definitions for the export/import pipeline.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::transfer;
use crate::state::AppState;

/// Transfer routes mounted at `/transfer`. All require authentication.
///
/// ```text
/// GET  /export -> export (?lockers=&categories=&items=)
/// POST /import -> import
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", get(transfer::export))
        .route("/import", post(transfer::import))
}
