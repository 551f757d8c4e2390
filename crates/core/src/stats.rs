//! Dashboard statistics shapes and bucketing helpers.
//!
//! The aggregation queries live in `lockbase-db`; this module owns the
//! wire shapes and the pure month-bucketing logic.

use serde::Serialize;

use crate::types::DbId;

/// English month abbreviations, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month bucket of the current-year item quantity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Month abbreviation (`"Jan"` .. `"Dec"`).
    pub name: &'static str,
    /// Summed item quantity created in that month.
    pub value: i64,
}

/// One slice of the per-locker item distribution chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerSlice {
    pub locker_id: DbId,
    pub code: String,
    pub name: String,
    /// Display label combining name and code, e.g. `"Shelf 1 (A001)"`.
    pub label: String,
    /// Summed item quantity stored in the locker.
    pub value: i64,
}

impl LockerSlice {
    pub fn new(locker_id: DbId, code: String, name: String, value: i64) -> Self {
        let label = format!("{name} ({code})");
        Self {
            locker_id,
            code,
            name,
            label,
            value,
        }
    }
}

/// The full dashboard stats response.
///
/// "Yesterday" figures exclude records created today (UTC day boundary),
/// giving a now-vs-start-of-day delta for each headline number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_now: i64,
    pub total_yesterday: i64,
    pub total_items_now: i64,
    pub total_items_yesterday: i64,
    pub total_categories_now: i64,
    pub total_categories_yesterday: i64,
    /// Always exactly 12 entries, January through December.
    pub items_monthly: Vec<MonthBucket>,
    pub locker_distribution: Vec<LockerSlice>,
}

/// Spread sparse `(month, quantity)` rows over all twelve months.
///
/// `month` is 1-based (January = 1). Months absent from `rows` get a zero
/// bucket; out-of-range months are ignored.
pub fn monthly_buckets(rows: &[(i32, i64)]) -> Vec<MonthBucket> {
    let mut values = [0i64; 12];
    for &(month, quantity) in rows {
        if (1..=12).contains(&month) {
            values[(month - 1) as usize] += quantity;
        }
    }
    MONTH_NAMES
        .iter()
        .zip(values)
        .map(|(&name, value)| MonthBucket { name, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_give_twelve_zero_buckets() {
        let buckets = monthly_buckets(&[]);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].name, "Jan");
        assert_eq!(buckets[11].name, "Dec");
        assert!(buckets.iter().all(|b| b.value == 0));
    }

    #[test]
    fn sparse_rows_land_in_their_month() {
        let buckets = monthly_buckets(&[(1, 5), (12, 7)]);
        assert_eq!(buckets[0].value, 5);
        assert_eq!(buckets[11].value, 7);
        assert_eq!(buckets[5].value, 0);
    }

    #[test]
    fn duplicate_months_accumulate() {
        let buckets = monthly_buckets(&[(3, 2), (3, 3)]);
        assert_eq!(buckets[2].value, 5);
    }

    #[test]
    fn out_of_range_months_are_ignored() {
        let buckets = monthly_buckets(&[(0, 9), (13, 9), (-2, 9)]);
        assert!(buckets.iter().all(|b| b.value == 0));
    }

    #[test]
    fn locker_slice_label_combines_name_and_code() {
        let slice = LockerSlice::new(1, "A001".into(), "Shelf 1".into(), 3);
        assert_eq!(slice.label, "Shelf 1 (A001)");
    }

    #[test]
    fn stats_response_serializes_camel_case() {
        let response = StatsResponse {
            total_now: 1,
            total_yesterday: 0,
            total_items_now: 3,
            total_items_yesterday: 3,
            total_categories_now: 2,
            total_categories_yesterday: 1,
            items_monthly: monthly_buckets(&[]),
            locker_distribution: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalNow"], 1);
        assert_eq!(json["totalItemsYesterday"], 3);
        assert_eq!(json["itemsMonthly"].as_array().unwrap().len(), 12);
        assert!(json["lockerDistribution"].as_array().unwrap().is_empty());
    }
}
