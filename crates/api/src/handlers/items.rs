//! Handlers for the `/items` resource.
//!
//! Every create/update verifies that the referenced category and locker
//! belong to the calling user before touching the row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockbase_core::error::CoreError;
use lockbase_core::types::DbId;
use lockbase_db::models::item::{CreateItem, Item, UpdateItem};
use lockbase_db::repositories::{CategoryRepo, ItemRepo, LockerRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /items`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    pub description: Option<String>,
    pub category_id: DbId,
    pub locker_id: DbId,
}

/// Request body for `PUT /items/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub locker_id: Option<DbId>,
}

/// List filters for `GET /items` in addition to the shared search/paging
/// parameters.
#[derive(Debug, Deserialize)]
pub struct ItemFilterParams {
    pub q: Option<String>,
    pub category_id: Option<DbId>,
    pub locker_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/items
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Item>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    ensure_references_owned(&state, auth.user_id, Some(input.category_id), Some(input.locker_id))
        .await?;

    let item = ItemRepo::create(
        &state.pool,
        &CreateItem {
            user_id: auth.user_id,
            category_id: input.category_id,
            locker_id: input.locker_id,
            name: input.name,
            quantity: input.quantity,
            description: input.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/items
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ItemFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Item>>>> {
    let limit = params.limit.unwrap_or(crate::query::DEFAULT_LIMIT).clamp(1, crate::query::MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let items = ItemRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.q.as_deref(),
        params.category_id,
        params.locker_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Item>>> {
    let item = ItemRepo::find_by_id_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(DataResponse { data: item }))
}

/// PUT /api/v1/items/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<Json<DataResponse<Item>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    ensure_references_owned(&state, auth.user_id, input.category_id, input.locker_id).await?;

    let update = UpdateItem {
        name: input.name,
        quantity: input.quantity,
        description: input.description,
        category_id: input.category_id,
        locker_id: input.locker_id,
    };

    let item = ItemRepo::update(&state.pool, id, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ItemRepo::delete(&state.pool, id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Verify that any referenced category/locker exists and belongs to the
/// calling user.
pub(crate) async fn ensure_references_owned(
    state: &AppState,
    user_id: DbId,
    category_id: Option<DbId>,
    locker_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = category_id {
        CategoryRepo::find_by_id_for_user(&state.pool, id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Category",
                id,
            }))?;
    }
    if let Some(id) = locker_id {
        LockerRepo::find_by_id_for_user(&state.pool, id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Locker",
                id,
            }))?;
    }
    Ok(())
}
