//! Locker entity model and DTOs.

use lockbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full locker row from the `lockers` table.
///
/// The `code` is globally unique across all users and immutable after
/// creation; `qr_code_url` is the rendered image of the code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Locker {
    pub id: DbId,
    pub user_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub qr_code_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a locker. The code and QR URL are settled by the
/// caller before the insert (generation, validation, QR rendering).
#[derive(Debug)]
pub struct CreateLocker {
    pub user_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub qr_code_url: String,
}

/// DTO for updating a locker. The code is deliberately absent: codes are
/// the identity key of a locker and never change after creation.
#[derive(Debug, Default)]
pub struct UpdateLocker {
    pub name: Option<String>,
    pub description: Option<String>,
}
