pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod items;
pub mod lockers;
pub mod stats;
pub mod transfer;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/me                       profile get/update (requires auth)
///
/// /admin/users                   list, create (admin only)
/// /admin/users/{id}              update, delete (admin only)
///
/// /lockers                       list, create
/// /lockers/{id}                  get, update, delete (empty only)
/// /lockers/bulk-delete           bulk delete with items action (POST)
///
/// /categories                    list, create
/// /categories/{id}               get, update, delete
///
/// /items                         list, create
/// /items/{id}                    get, update, delete
/// /items/bulk-delete             all-or-nothing bulk delete (POST)
/// /items/bulk-move               bulk move (POST)
///
/// /transfer/export               portable document export (GET)
/// /transfer/import               two-phase import reconciliation (POST)
///
/// /stats                         dashboard aggregation (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/lockers", lockers::router())
        .nest("/categories", categories::router())
        .nest("/items", items::router())
        .nest("/transfer", transfer::router())
        .nest("/stats", stats::router())
}
