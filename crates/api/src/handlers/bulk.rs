//! Bulk mutation handlers: many-item delete/move and multi-locker delete
//! with the contained-items relocation policy.

use axum::extract::State;
use axum::Json;
use lockbase_core::error::CoreError;
use lockbase_core::types::DbId;
use lockbase_db::repositories::locker_repo::ItemsAction;
use lockbase_db::repositories::{ItemRepo, LockerRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::items::ensure_references_owned;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /items/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteItemsRequest {
    pub item_ids: Vec<DbId>,
}

/// Request body for `POST /items/bulk-move`.
///
/// Sources select by explicit ids or by current category/locker; at least
/// one selector and one destination must be present.
#[derive(Debug, Deserialize)]
pub struct BulkMoveItemsRequest {
    pub item_ids: Option<Vec<DbId>>,
    pub source_category_id: Option<DbId>,
    pub source_locker_id: Option<DbId>,
    pub new_category_id: Option<DbId>,
    pub new_locker_id: Option<DbId>,
}

/// Request body for `POST /lockers/bulk-delete`.
///
/// `items_action` is required as soon as any selected locker still
/// contains items; `target_locker_id` is required for the `move` action.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteLockersRequest {
    pub locker_ids: Vec<DbId>,
    pub items_action: Option<ItemsAction>,
    pub target_locker_id: Option<DbId>,
}

/// Row-count response for bulk mutations.
#[derive(Debug, Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/items/bulk-delete
///
/// All-or-nothing: if even one id is missing or owned by someone else,
/// nothing is deleted and the caller gets a 404.
pub async fn delete_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteItemsRequest>,
) -> AppResult<Json<DataResponse<AffectedResponse>>> {
    if input.item_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "item_ids must not be empty".into(),
        )));
    }

    let Some(deleted) =
        ItemRepo::delete_many_checked(&state.pool, &input.item_ids, auth.user_id).await?
    else {
        // Count mismatch: report the first offending id, delete nothing.
        let missing = ItemRepo::missing_ids(&state.pool, &input.item_ids, auth.user_id).await?;
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: missing.first().copied().unwrap_or_default(),
        }));
    };

    tracing::info!(user_id = auth.user_id, deleted, "Bulk item delete");

    Ok(Json(DataResponse {
        data: AffectedResponse { affected: deleted },
    }))
}

/// POST /api/v1/items/bulk-move
pub async fn move_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkMoveItemsRequest>,
) -> AppResult<Json<DataResponse<AffectedResponse>>> {
    let has_selector = input.item_ids.as_ref().is_some_and(|ids| !ids.is_empty())
        || input.source_category_id.is_some()
        || input.source_locker_id.is_some();
    if !has_selector {
        return Err(AppError::Core(CoreError::Validation(
            "Provide item_ids, source_category_id, or source_locker_id".into(),
        )));
    }
    if input.new_category_id.is_none() && input.new_locker_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Provide new_category_id and/or new_locker_id".into(),
        )));
    }

    // Destinations must belong to the caller.
    ensure_references_owned(&state, auth.user_id, input.new_category_id, input.new_locker_id)
        .await?;

    let moved = ItemRepo::move_many(
        &state.pool,
        auth.user_id,
        input.item_ids.as_deref(),
        input.source_category_id,
        input.source_locker_id,
        input.new_category_id,
        input.new_locker_id,
    )
    .await?;

    tracing::info!(user_id = auth.user_id, moved, "Bulk item move");

    Ok(Json(DataResponse {
        data: AffectedResponse { affected: moved },
    }))
}

/// POST /api/v1/lockers/bulk-delete
///
/// Empty lockers delete without a decision. As soon as any selected
/// locker contains items, the caller must pick an `items_action`:
/// relocate everything to one surviving locker, or cascade-delete.
pub async fn delete_lockers(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteLockersRequest>,
) -> AppResult<Json<DataResponse<AffectedResponse>>> {
    if input.locker_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "locker_ids must not be empty".into(),
        )));
    }

    let owned = LockerRepo::count_owned(&state.pool, &input.locker_ids, auth.user_id).await?;
    if owned != input.locker_ids.len() as i64 {
        let missing = LockerRepo::missing_ids(&state.pool, &input.locker_ids, auth.user_id).await?;
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Locker",
            id: missing.first().copied().unwrap_or_default(),
        }));
    }

    let contained = LockerRepo::item_count(&state.pool, &input.locker_ids).await?;

    let action = if contained == 0 {
        // Nothing inside; the cascade branch is a no-op.
        ItemsAction::Delete
    } else {
        match input.items_action {
            Some(action) => action,
            None => {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "The selected lockers still contain {contained} item(s); set items_action \
                     to \"move\" or \"delete\""
                ))))
            }
        }
    };

    if action == ItemsAction::Move && contained > 0 {
        let target = input.target_locker_id.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "items_action \"move\" requires target_locker_id".into(),
            ))
        })?;
        if input.locker_ids.contains(&target) {
            return Err(AppError::Core(CoreError::Validation(
                "target_locker_id must not be one of the lockers being deleted".into(),
            )));
        }
        LockerRepo::find_by_id_for_user(&state.pool, target, auth.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Locker",
                id: target,
            }))?;
    }

    let deleted = LockerRepo::delete_many(
        &state.pool,
        auth.user_id,
        &input.locker_ids,
        action,
        input.target_locker_id,
    )
    .await?;

    tracing::info!(user_id = auth.user_id, deleted, ?action, "Bulk locker delete");

    Ok(Json(DataResponse {
        data: AffectedResponse { affected: deleted },
    }))
}
