use crate::types::DbId;

/// Domain error taxonomy shared by the persistence and API layers.
///
/// The API layer maps each variant to an HTTP status and a stable error
/// code; see `lockbase-api`'s `AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A transaction exceeded its explicit time ceiling and was rolled
    /// back. Nothing was persisted; the operation is safe to retry.
    #[error("Transaction exceeded its {seconds}s time ceiling")]
    TransactionTimeout { seconds: u64 },

    /// An external collaborator (the QR encoder service) failed.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
