//! Export assembler and import reconciler handlers.
//!
//! Export reads the caller's entities and serializes them into the
//! versioned, id-free document of `lockbase_core::transfer`. Import runs
//! in two phases: code reconciliation + QR rendering outside any
//! transaction, then a single timeout-bounded merge transaction.

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use lockbase_core::code;
use lockbase_core::error::CoreError;
use lockbase_core::transfer::{
    validate_import, validate_version, widen_to_referenced, CategoryRecord, ExportDocument,
    ImportSummary, ItemRecord, LockerRecord, PreparedLocker, TransferData, EXPORT_VERSION,
};
use lockbase_db::repositories::{LockerRepo, TransferRepo};
use lockbase_db::TxError;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Entity selection flags for `GET /transfer/export`.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub lockers: bool,
    #[serde(default)]
    pub categories: bool,
    #[serde(default)]
    pub items: bool,
}

/// Request body for `POST /transfer/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Version tag as stamped by export; checked when present.
    pub version: Option<String>,
    pub data: TransferData,
}

/// Denormalized item row used by the export query.
#[derive(Debug, sqlx::FromRow)]
struct ExportItemRow {
    name: String,
    quantity: i32,
    description: Option<String>,
    category_name: String,
    locker_code: String,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/transfer/export?lockers=&categories=&items=
///
/// Returns the portable document. When `items` is selected, the locker
/// and category arrays are narrowed to exactly the entries the items
/// reference, so every cross-reference resolves inside the document.
pub async fn export(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<Json<ExportDocument>> {
    if !params.lockers && !params.categories && !params.items {
        return Err(AppError::Core(CoreError::Validation(
            "Select at least one of lockers, categories, items".into(),
        )));
    }

    let mut data = TransferData::default();

    if params.lockers || params.items {
        let rows: Vec<(String, String, Option<String>, String)> = sqlx::query_as(
            "SELECT code, name, description, qr_code_url
             FROM lockers WHERE user_id = $1 ORDER BY code ASC",
        )
        .bind(auth.user_id)
        .fetch_all(&state.pool)
        .await?;
        data.lockers = rows
            .into_iter()
            .map(|(code, name, description, qr_code_url)| LockerRecord {
                code,
                name,
                description,
                qr_code_url: Some(qr_code_url),
            })
            .collect();
    }

    if params.categories || params.items {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM categories WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(auth.user_id)
        .fetch_all(&state.pool)
        .await?;
        data.categories = rows
            .into_iter()
            .map(|(name,)| CategoryRecord { name })
            .collect();
    }

    if params.items {
        let rows: Vec<ExportItemRow> = sqlx::query_as(
            "SELECT i.name, i.quantity, i.description,
                    c.name AS category_name, l.code AS locker_code
             FROM items i
             JOIN categories c ON c.id = i.category_id
             JOIN lockers l ON l.id = i.locker_id
             WHERE i.user_id = $1
             ORDER BY i.created_at ASC",
        )
        .bind(auth.user_id)
        .fetch_all(&state.pool)
        .await?;
        data.items = rows
            .into_iter()
            .map(|r| ItemRecord {
                name: r.name,
                quantity: r.quantity,
                description: r.description,
                category_name: r.category_name,
                locker_code: r.locker_code,
            })
            .collect();

        widen_to_referenced(&mut data);
    }

    tracing::info!(
        user_id = auth.user_id,
        lockers = data.lockers.len(),
        categories = data.categories.len(),
        items = data.items.len(),
        "Export assembled",
    );

    Ok(Json(ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: Utc::now(),
        exported_by: auth.user_id,
        data,
    }))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// POST /api/v1/transfer/import
///
/// Phase 1 settles an effective code and a rendered QR image for every
/// incoming locker without holding any lock; phase 2 merges everything
/// inside one transaction bounded by the configured time ceiling. A QR
/// failure aborts before any database write; a timeout rolls everything
/// back and reports a retryable failure.
pub async fn import(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    if let Some(version) = &input.version {
        validate_version(version)?;
    }
    validate_import(&input.data)?;

    let prepared = reconcile_codes(&state, &input.data.lockers).await?;

    let ceiling = Duration::from_secs(state.config.import_tx_timeout_secs);
    let summary = TransferRepo::merge(
        &state.pool,
        ceiling,
        auth.user_id,
        prepared,
        input.data.categories,
        input.data.items,
    )
    .await
    .map_err(|e| match e {
        TxError::Timeout(d) => AppError::Core(CoreError::TransactionTimeout {
            seconds: d.as_secs(),
        }),
        TxError::Inner(db) => AppError::Database(db),
    })?;

    tracing::info!(
        user_id = auth.user_id,
        lockers_created = summary.lockers_created,
        categories_created = summary.categories_created,
        items_created = summary.items_created,
        items_updated = summary.items_updated,
        items_skipped = summary.items_skipped,
        codes_changed = summary.code_changes.len(),
        "Import merged",
    );

    Ok(Json(DataResponse { data: summary }))
}

/// Phase 1: decide an effective code for every incoming locker and render
/// its QR image. Runs outside any transaction.
///
/// A code is kept only when it is free in the global namespace AND not
/// already claimed earlier in the same document. Malformed incoming codes
/// are treated like collisions and regenerated. The retry loop is capped;
/// past the cap, the timestamp fallback applies.
async fn reconcile_codes(
    state: &AppState,
    lockers: &[LockerRecord],
) -> AppResult<Vec<PreparedLocker>> {
    let mut reserved: HashSet<String> = HashSet::new();
    let mut prepared = Vec::with_capacity(lockers.len());

    for locker in lockers {
        let keep_original = code::is_valid_code(&locker.code)
            && !reserved.contains(&locker.code)
            && !LockerRepo::code_exists(&state.pool, &locker.code).await?;

        let effective_code = if keep_original {
            locker.code.clone()
        } else {
            generate_effective_code(state, &reserved).await?
        };
        reserved.insert(effective_code.clone());

        // Every locker gets a fresh QR render for its effective code, up
        // front; any failure aborts the import before phase 2 starts.
        let qr_code_url = state.qr.encode(&effective_code).await?;

        prepared.push(PreparedLocker {
            original_code: locker.code.clone(),
            effective_code,
            name: locker.name.clone(),
            description: locker.description.clone(),
            qr_code_url,
        });
    }

    Ok(prepared)
}

/// Bounded-retry generation against both the store and the in-document
/// reservations, with the timestamp fallback on exhaustion.
async fn generate_effective_code(
    state: &AppState,
    reserved: &HashSet<String>,
) -> AppResult<String> {
    for _ in 0..code::MAX_IMPORT_CODE_ATTEMPTS {
        let candidate = code::random_code(&mut rand::rng());
        if reserved.contains(&candidate) {
            continue;
        }
        if !LockerRepo::code_exists(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    let fallback = code::fallback_code(&mut rand::rng(), Utc::now().timestamp_millis());
    tracing::warn!(code = %fallback, "Code generation exhausted; using timestamp fallback");
    Ok(fallback)
}
