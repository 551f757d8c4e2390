//! Category entity model and DTOs.

use lockbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full category row from the `categories` table.
///
/// Names are unique per owning user, case-insensitively.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a category.
#[derive(Debug)]
pub struct CreateCategory {
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a category. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}
