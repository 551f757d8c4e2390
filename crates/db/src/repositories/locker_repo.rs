//! Repository for the `lockers` table.

use lockbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::locker::{CreateLocker, Locker, UpdateLocker};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, code, name, description, qr_code_url, created_at, updated_at";

/// What to do with items still inside lockers selected for bulk deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemsAction {
    /// Relocate contained items to a designated surviving locker.
    Move,
    /// Cascade-delete contained items along with the lockers.
    Delete,
}

/// Provides CRUD and bulk operations for lockers.
pub struct LockerRepo;

impl LockerRepo {
    /// Insert a new locker, returning the created row.
    ///
    /// The `uq_lockers_code` constraint backs the global code namespace:
    /// two writers racing on the same generated code surface here as a
    /// unique violation, which the API maps to a retryable 409.
    pub async fn create(pool: &PgPool, input: &CreateLocker) -> Result<Locker, sqlx::Error> {
        let query = format!(
            "INSERT INTO lockers (user_id, code, name, description, qr_code_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(input.user_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.qr_code_url)
            .fetch_one(pool)
            .await
    }

    /// Find a locker by id, scoped to its owning user.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Probe whether a code is taken by ANY locker of ANY user.
    ///
    /// Codes are a global namespace; this is the uniqueness check behind
    /// both the simple generation path and the import reconciler.
    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM lockers WHERE code = $1)")
                .bind(code)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// List a user's lockers, newest first, with optional name/code search.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Locker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lockers
             WHERE user_id = $1
               AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR code ILIKE '%' || $2 || '%')
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(user_id)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a locker's name/description. The code never changes.
    ///
    /// Returns `None` if the locker does not exist for this user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateLocker,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!(
            "UPDATE lockers SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a single locker. Returns `true` if a row was removed.
    ///
    /// The caller verifies the locker is empty first; the RESTRICT
    /// foreign key on items backs that check.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lockers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count how many of the given locker ids belong to `user_id`.
    pub async fn count_owned(
        pool: &PgPool,
        ids: &[DbId],
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM lockers WHERE id = ANY($1) AND user_id = $2",
        )
        .bind(ids)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Of the given ids, return those that do NOT exist for `user_id`.
    pub async fn missing_ids(
        pool: &PgPool,
        ids: &[DbId],
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT x.id FROM UNNEST($1::bigint[]) AS x(id)
             WHERE NOT EXISTS (
                 SELECT 1 FROM lockers l WHERE l.id = x.id AND l.user_id = $2
             )",
        )
        .bind(ids)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Count the items contained in any of the given lockers.
    pub async fn item_count(pool: &PgPool, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM items WHERE locker_id = ANY($1)")
                .bind(ids)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Bulk-delete lockers, applying the caller's decision for contained
    /// items: relocate them to `target` or cascade-delete them. Runs in
    /// one transaction; returns the number of lockers removed.
    pub async fn delete_many(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
        action: ItemsAction,
        target: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        match action {
            ItemsAction::Move => {
                sqlx::query(
                    "UPDATE items SET locker_id = $1, updated_at = NOW()
                     WHERE locker_id = ANY($2) AND user_id = $3",
                )
                .bind(target)
                .bind(ids)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
            ItemsAction::Delete => {
                sqlx::query("DELETE FROM items WHERE locker_id = ANY($1) AND user_id = $2")
                    .bind(ids)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let result = sqlx::query("DELETE FROM lockers WHERE id = ANY($1) AND user_id = $2")
            .bind(ids)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
