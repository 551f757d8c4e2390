//! Handlers for the `/categories` resource.
//!
//! Category names are unique per user, case-insensitively; the check runs
//! before insert and update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockbase_core::error::CoreError;
use lockbase_core::types::DbId;
use lockbase_db::models::category::{Category, CreateCategory, UpdateCategory};
use lockbase_db::repositories::{CategoryRepo, ItemRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Request body for `PUT /categories/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/v1/categories
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if CategoryRepo::name_taken(&state.pool, auth.user_id, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A category named {:?} already exists",
            input.name
        ))));
    }

    let category = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            user_id: auth.user_id,
            name: input.name,
            description: input.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.q.as_deref(),
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<DataResponse<Category>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if let Some(name) = &input.name {
        if CategoryRepo::name_taken(&state.pool, auth.user_id, name, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A category named {name:?} already exists"
            ))));
        }
    }

    let update = UpdateCategory {
        name: input.name,
        description: input.description,
    };

    let category = CategoryRepo::update(&state.pool, id, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Categories still referenced by items cannot be deleted.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let category = CategoryRepo::find_by_id_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    let referenced = ItemRepo::count_in_category(&state.pool, category.id).await?;
    if referenced > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category {:?} is still used by {referenced} item(s)",
            category.name
        ))));
    }

    CategoryRepo::delete(&state.pool, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
