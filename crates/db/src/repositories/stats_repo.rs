//! Read-side aggregation queries for the dashboard stats endpoint.

use lockbase_core::types::DbId;
use sqlx::PgPool;

/// A now-vs-start-of-day pair for one headline figure.
///
/// `yesterday` excludes rows created today (UTC day boundary), so the
/// delta between the two fields is "what changed today".
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CountPair {
    pub now: i64,
    pub yesterday: i64,
}

/// One row of the per-locker quantity distribution.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LockerQuantityRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub total: i64,
}

/// Provides the dashboard aggregation queries. Read-only.
pub struct StatsRepo;

impl StatsRepo {
    /// Locker counts for a user: total now and as of start of today.
    pub async fn locker_counts(pool: &PgPool, user_id: DbId) -> Result<CountPair, sqlx::Error> {
        sqlx::query_as::<_, CountPair>(
            "SELECT COUNT(*) AS now,
                    COUNT(*) FILTER (WHERE created_at < date_trunc('day', NOW())) AS yesterday
             FROM lockers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Summed item quantities for a user: now and as of start of today.
    pub async fn item_quantity_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<CountPair, sqlx::Error> {
        sqlx::query_as::<_, CountPair>(
            "SELECT COALESCE(SUM(quantity), 0)::bigint AS now,
                    COALESCE(SUM(quantity) FILTER (WHERE created_at < date_trunc('day', NOW())), 0)::bigint AS yesterday
             FROM items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Category counts for a user: total now and as of start of today.
    pub async fn category_counts(pool: &PgPool, user_id: DbId) -> Result<CountPair, sqlx::Error> {
        sqlx::query_as::<_, CountPair>(
            "SELECT COUNT(*) AS now,
                    COUNT(*) FILTER (WHERE created_at < date_trunc('day', NOW())) AS yesterday
             FROM categories WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Sparse `(month, summed quantity)` rows for items created in the
    /// current calendar year. Months with no items are absent; the core
    /// bucketing helper spreads the result over all twelve months.
    pub async fn monthly_item_quantities(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<(i32, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (i32, i64)>(
            "SELECT EXTRACT(MONTH FROM created_at)::int AS month,
                    COALESCE(SUM(quantity), 0)::bigint AS total
             FROM items
             WHERE user_id = $1 AND created_at >= date_trunc('year', NOW())
             GROUP BY month
             ORDER BY month",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Summed item quantity per locker, across ALL of a user's lockers
    /// (empty lockers appear with a zero total).
    pub async fn locker_distribution(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LockerQuantityRow>, sqlx::Error> {
        sqlx::query_as::<_, LockerQuantityRow>(
            "SELECT l.id, l.code, l.name, COALESCE(SUM(i.quantity), 0)::bigint AS total
             FROM lockers l
             LEFT JOIN items i ON i.locker_id = l.id
             WHERE l.user_id = $1
             GROUP BY l.id, l.code, l.name
             ORDER BY l.code ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
