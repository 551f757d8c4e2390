//! Route definitions for the dashboard stats endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Stats routes mounted at `/stats`. Requires authentication.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stats::overview))
}
