//! Handlers for the `/lockers` resource.
//!
//! Locker creation settles the code first (caller-supplied and validated,
//! or generated against the global namespace) and renders its QR image
//! before the insert. Codes never change afterwards.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockbase_core::code;
use lockbase_core::error::CoreError;
use lockbase_core::types::DbId;
use lockbase_db::models::locker::{CreateLocker, Locker, UpdateLocker};
use lockbase_db::repositories::LockerRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /lockers`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLockerRequest {
    /// Optional caller-supplied code; validated against `^[A-Z]\d{3}$`
    /// and the global namespace. Omit to have one generated.
    pub code: Option<String>,
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Request body for `PUT /lockers/{id}`. The code is immutable and
/// deliberately not accepted here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLockerRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/v1/lockers
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLockerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Locker>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let code = match input.code {
        Some(code) => {
            if !code::is_valid_code(&code) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Code {code:?} does not match the required format (one uppercase \
                     letter followed by three digits)"
                ))));
            }
            if LockerRepo::code_exists(&state.pool, &code).await? {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Code {code} is already in use"
                ))));
            }
            code
        }
        None => generate_unique_code(&state).await?,
    };

    // Render the QR image before touching the database; a dead encoder
    // fails the creation instead of leaving a broken image link.
    let qr_code_url = state.qr.encode(&code).await?;

    let locker = LockerRepo::create(
        &state.pool,
        &CreateLocker {
            user_id: auth.user_id,
            code,
            name: input.name,
            description: input.description,
            qr_code_url,
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, locker_id = locker.id, code = %locker.code, "Locker created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: locker })))
}

/// GET /api/v1/lockers
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Locker>>>> {
    let lockers = LockerRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.q.as_deref(),
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: lockers }))
}

/// GET /api/v1/lockers/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Locker>>> {
    let locker = LockerRepo::find_by_id_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Locker",
            id,
        }))?;
    Ok(Json(DataResponse { data: locker }))
}

/// PUT /api/v1/lockers/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLockerRequest>,
) -> AppResult<Json<DataResponse<Locker>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let update = UpdateLocker {
        name: input.name,
        description: input.description,
    };

    let locker = LockerRepo::update(&state.pool, id, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Locker",
            id,
        }))?;
    Ok(Json(DataResponse { data: locker }))
}

/// DELETE /api/v1/lockers/{id}
///
/// Single-locker delete only works on empty lockers; non-empty lockers
/// need the bulk endpoint with an explicit items action.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let locker = LockerRepo::find_by_id_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Locker",
            id,
        }))?;

    let contained = LockerRepo::item_count(&state.pool, &[locker.id]).await?;
    if contained > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Locker {} still contains {contained} item(s); move or delete them first",
            locker.code
        ))));
    }

    LockerRepo::delete(&state.pool, id, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, locker_id = id, "Locker deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Generate a code that is free in the global namespace at probe time.
///
/// The simple creation path retries without an explicit bound; collision
/// probability is birthday-bound and small at realistic data volumes, and
/// the unique constraint backstops the generate-then-insert race.
async fn generate_unique_code(state: &AppState) -> AppResult<String> {
    loop {
        let candidate = code::random_code(&mut rand::rng());
        if !LockerRepo::code_exists(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
    }
}
