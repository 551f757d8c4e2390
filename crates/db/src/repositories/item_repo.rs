//! Repository for the `items` table.

use lockbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, category_id, locker_id, name, quantity, description, created_at, updated_at";

/// Provides CRUD and bulk operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (user_id, category_id, locker_id, name, quantity, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(input.locker_id)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an item by id, scoped to its owning user.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's items, newest first, with optional name search and
    /// category/locker filters.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
        category_id: Option<DbId>,
        locker_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE user_id = $1
               AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
               AND ($3::bigint IS NULL OR category_id = $3)
               AND ($4::bigint IS NULL OR locker_id = $4)
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(user_id)
            .bind(search)
            .bind(category_id)
            .bind(locker_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the item does not exist for this user. The
    /// caller verifies ownership of any new category/locker reference.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($3, name),
                quantity = COALESCE($4, quantity),
                description = COALESCE($5, description),
                category_id = COALESCE($6, category_id),
                locker_id = COALESCE($7, locker_id),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.locker_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a single item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete many items after verifying, inside one transaction, that
    /// EVERY id belongs to `user_id`.
    ///
    /// Returns `None` (and deletes nothing) when the ownership count does
    /// not match; `Some(n)` with the number of rows removed otherwise.
    pub async fn delete_many_checked(
        pool: &PgPool,
        ids: &[DbId],
        user_id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM items WHERE id = ANY($1) AND user_id = $2")
                .bind(ids)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if owned.0 != ids.len() as i64 {
            // Count mismatch: at least one id is missing or foreign.
            // Roll back without touching any row.
            return Ok(None);
        }

        let result = sqlx::query("DELETE FROM items WHERE id = ANY($1) AND user_id = $2")
            .bind(ids)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(result.rows_affected()))
    }

    /// Move all matching items to a new category and/or locker in one
    /// pass. Sources select by explicit ids, by current category, or by
    /// current locker; destination fields left `None` stay unchanged.
    ///
    /// Returns the number of rows updated.
    pub async fn move_many(
        pool: &PgPool,
        user_id: DbId,
        ids: Option<&[DbId]>,
        source_category_id: Option<DbId>,
        source_locker_id: Option<DbId>,
        new_category_id: Option<DbId>,
        new_locker_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET
                category_id = COALESCE($5, category_id),
                locker_id = COALESCE($6, locker_id),
                updated_at = NOW()
             WHERE user_id = $1
               AND ($2::bigint[] IS NULL OR id = ANY($2))
               AND ($3::bigint IS NULL OR category_id = $3)
               AND ($4::bigint IS NULL OR locker_id = $4)",
        )
        .bind(user_id)
        .bind(ids)
        .bind(source_category_id)
        .bind(source_locker_id)
        .bind(new_category_id)
        .bind(new_locker_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
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
                 SELECT 1 FROM items i WHERE i.id = x.id AND i.user_id = $2
             )",
        )
        .bind(ids)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Count the items referencing a category.
    pub async fn count_in_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
