//! Dashboard statistics handler. Read-only aggregation.

use axum::extract::State;
use axum::Json;
use lockbase_core::stats::{monthly_buckets, LockerSlice, StatsResponse};
use lockbase_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/stats
///
/// Headline counts (now vs start of today), the current-year monthly
/// quantity chart, and the per-locker quantity distribution.
pub async fn overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<StatsResponse>> {
    let lockers = StatsRepo::locker_counts(&state.pool, auth.user_id).await?;
    let items = StatsRepo::item_quantity_counts(&state.pool, auth.user_id).await?;
    let categories = StatsRepo::category_counts(&state.pool, auth.user_id).await?;

    let monthly = StatsRepo::monthly_item_quantities(&state.pool, auth.user_id).await?;
    let distribution = StatsRepo::locker_distribution(&state.pool, auth.user_id).await?;

    Ok(Json(StatsResponse {
        total_now: lockers.now,
        total_yesterday: lockers.yesterday,
        total_items_now: items.now,
        total_items_yesterday: items.yesterday,
        total_categories_now: categories.now,
        total_categories_yesterday: categories.yesterday,
        items_monthly: monthly_buckets(&monthly),
        locker_distribution: distribution
            .into_iter()
            .map(|r| LockerSlice::new(r.id, r.code, r.name, r.total))
            .collect(),
    }))
}
