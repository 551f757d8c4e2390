//! Item entity model and DTOs.

use lockbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full item row from the `items` table.
///
/// References exactly one category and one locker, both owned by the same
/// user as the item itself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub locker_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an item. Ownership of the referenced category and
/// locker is verified by the caller before the insert.
#[derive(Debug)]
pub struct CreateItem {
    pub user_id: DbId,
    pub category_id: DbId,
    pub locker_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub description: Option<String>,
}

/// DTO for updating an item. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub locker_id: Option<DbId>,
}
