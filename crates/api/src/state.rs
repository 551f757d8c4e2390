use std::sync::Arc;

use crate::config::ServerConfig;
use crate::qr::QrEncoder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lockbase_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// QR encoder client used when lockers are created or imported.
    pub qr: Arc<dyn QrEncoder>,
}
