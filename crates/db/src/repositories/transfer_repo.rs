//! The transactional half of the import reconciler.
//!
//! Phase 1 (code reconciliation and QR rendering) runs in the API layer
//! before any database write. This repository owns phase 2: a single
//! timeout-bounded transaction that merges categories, creates lockers,
//! and reconciles items. Any error or a blown time ceiling rolls the
//! whole merge back; no partial writes survive.

use std::collections::HashMap;
use std::time::Duration;

use lockbase_core::transfer::{
    code_changes, CategoryRecord, ImportSummary, ItemRecord, PreparedLocker,
};
use lockbase_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::item::Item;
use crate::tx::{with_transaction, TxError};

/// Runs the import merge transaction.
pub struct TransferRepo;

impl TransferRepo {
    /// Merge a prepared import into `user_id`'s data set within `ceiling`.
    ///
    /// Returns the summary counters and the code-change report. On
    /// `TxError::Timeout` nothing was persisted and the import is safe to
    /// retry.
    pub async fn merge(
        pool: &PgPool,
        ceiling: Duration,
        user_id: DbId,
        lockers: Vec<PreparedLocker>,
        categories: Vec<CategoryRecord>,
        items: Vec<ItemRecord>,
    ) -> Result<ImportSummary, TxError<sqlx::Error>> {
        with_transaction(pool, ceiling, move |tx| {
            Box::pin(async move { merge_in_tx(tx, user_id, lockers, categories, items).await })
        })
        .await
    }
}

async fn merge_in_tx(
    tx: &mut Transaction<'static, Postgres>,
    user_id: DbId,
    lockers: Vec<PreparedLocker>,
    categories: Vec<CategoryRecord>,
    items: Vec<ItemRecord>,
) -> Result<ImportSummary, sqlx::Error> {
    let mut summary = ImportSummary {
        code_changes: code_changes(&lockers),
        ..Default::default()
    };

    // 1. Categories: reuse an exact-name match for this user, else create.
    let mut category_ids: HashMap<String, DbId> = HashMap::new();
    for category in &categories {
        if category_ids.contains_key(&category.name) {
            continue;
        }
        let existing: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM categories WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(&category.name)
                .fetch_optional(&mut **tx)
                .await?;

        let id = match existing {
            Some((id,)) => id,
            None => {
                let row: (DbId,) = sqlx::query_as(
                    "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING id",
                )
                .bind(user_id)
                .bind(&category.name)
                .fetch_one(&mut **tx)
                .await?;
                summary.categories_created += 1;
                row.0
            }
        };
        category_ids.insert(category.name.clone(), id);
    }

    // 2. Lockers: always create a new row under the effective code.
    // Incoming lockers are never merged into existing ones; only the code
    // collision was resolved in phase 1, not semantic duplication.
    let mut locker_ids: HashMap<String, DbId> = HashMap::new();
    for locker in &lockers {
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO lockers (user_id, code, name, description, qr_code_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(user_id)
        .bind(&locker.effective_code)
        .bind(&locker.name)
        .bind(&locker.description)
        .bind(&locker.qr_code_url)
        .fetch_one(&mut **tx)
        .await?;
        summary.lockers_created += 1;
        // Keyed by the ORIGINAL code: items reference the code as written
        // in the document, and the rename is traced through here.
        locker_ids.insert(locker.original_code.clone(), row.0);
    }

    // 3. Items: resolve references inside the document; skip what does
    // not resolve, merge quantity into an identical existing item.
    for item in &items {
        let (Some(&category_id), Some(&locker_id)) = (
            category_ids.get(&item.category_name),
            locker_ids.get(&item.locker_code),
        ) else {
            summary.items_skipped += 1;
            continue;
        };

        let existing = sqlx::query_as::<_, Item>(
            "SELECT id, user_id, category_id, locker_id, name, quantity, description, \
                    created_at, updated_at
             FROM items
             WHERE user_id = $1 AND name = $2 AND category_id = $3 AND locker_id = $4",
        )
        .bind(user_id)
        .bind(&item.name)
        .bind(category_id)
        .bind(locker_id)
        .fetch_optional(&mut **tx)
        .await?;

        match existing {
            Some(row) => {
                // Same logical item: add quantities; the incoming
                // description wins only when it is non-empty.
                let description = match &item.description {
                    Some(d) if !d.is_empty() => Some(d.clone()),
                    _ => row.description.clone(),
                };
                sqlx::query(
                    "UPDATE items SET quantity = quantity + $2, description = $3, \
                            updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(row.id)
                .bind(item.quantity)
                .bind(&description)
                .execute(&mut **tx)
                .await?;
                summary.items_updated += 1;
            }
            None => {
                sqlx::query(
                    "INSERT INTO items (user_id, category_id, locker_id, name, quantity, description)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(user_id)
                .bind(category_id)
                .bind(locker_id)
                .bind(&item.name)
                .bind(item.quantity)
                .bind(&item.description)
                .execute(&mut **tx)
                .await?;
                summary.items_created += 1;
            }
        }
    }

    tracing::debug!(
        categories = summary.categories_created,
        lockers = summary.lockers_created,
        items_created = summary.items_created,
        items_updated = summary.items_updated,
        items_skipped = summary.items_skipped,
        "Merge transaction assembled",
    );

    Ok(summary)
}
