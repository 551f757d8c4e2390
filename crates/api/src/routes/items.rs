//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bulk, items};
use crate::state::AppState;

/// Item routes mounted at `/items`. All require authentication.
///
/// ```text
/// GET    /             -> list (?q=&category_id=&locker_id=&limit=&offset=)
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// POST   /bulk-delete  -> all-or-nothing bulk delete
/// POST   /bulk-move    -> bulk move to a new category and/or locker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/bulk-delete", post(bulk::delete_items))
        .route("/bulk-move", post(bulk::move_items))
        .route(
            "/{id}",
            get(items::get_by_id)
                .put(items::update)
                .delete(items::delete),
        )
}
