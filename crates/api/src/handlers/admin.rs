//! Admin-only user management handlers.
//!
//! All endpoints require the admin role via [`AdminUser`]. Deleting or
//! demoting a user is guarded by the at-least-one-admin invariant.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lockbase_core::error::CoreError;
use lockbase_core::roles::{is_valid_role, ROLE_ADMIN, ROLE_USER};
use lockbase_core::types::DbId;
use lockbase_db::models::user::{CreateUser, UpdateUser, UserResponse};
use lockbase_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{check_password_strength, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "display_name must not be empty"))]
    pub display_name: String,
    /// `"admin"` or `"user"`.
    pub role: String,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    check_password_strength(&input.password)?;

    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role {:?}",
            input.role
        ))));
    }

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Username is already taken".into(),
        )));
    }
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            display_name: input.display_name,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User created by admin");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// PUT /api/v1/admin/users/{id}
///
/// Role demotion is refused when it would leave the system without an
/// admin.
pub async fn update_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(role) = &input.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role {role:?}"
            ))));
        }
    }

    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let demoting = target.role == ROLE_ADMIN && input.role.as_deref() == Some(ROLE_USER);
    if demoting && UserRepo::count_admins(&state.pool).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot demote the last remaining admin".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Refuses to delete the last remaining admin; the row stays in place.
pub async fn delete_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if target.role == ROLE_ADMIN && UserRepo::count_admins(&state.pool).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete the last remaining admin".into(),
        )));
    }

    UserRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = id, "User deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
