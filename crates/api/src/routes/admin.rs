//! Route definitions for the admin-only user management surface.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// User management routes mounted at `/admin`.
///
/// ```text
/// GET    /users      -> list_users
/// POST   /users      -> create_user
/// PUT    /users/{id} -> update_user
/// DELETE /users/{id} -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            axum::routing::put(admin::update_user).delete(admin::delete_user),
        )
}
