//! Route definitions for the `/lockers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bulk, lockers};
use crate::state::AppState;

/// Locker routes mounted at `/lockers`. All require authentication.
///
/// ```text
/// GET    /             -> list (?q=&limit=&offset=)
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete (empty lockers only)
/// POST   /bulk-delete  -> bulk delete with items relocation policy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lockers::list).post(lockers::create))
        .route("/bulk-delete", post(bulk::delete_lockers))
        .route(
            "/{id}",
            get(lockers::get_by_id)
                .put(lockers::update)
                .delete(lockers::delete),
        )
}
