use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time ceiling for the import merge transaction in seconds (default: `15`).
    pub import_tx_timeout_secs: u64,
    /// Base URL of the external QR render service.
    pub qr_endpoint: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Default QR render service endpoint.
const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                      |
    /// |--------------------------|----------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                    |
    /// | `PORT`                   | `3000`                                       |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                      |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                         |
    /// | `IMPORT_TX_TIMEOUT_SECS` | `15`                                         |
    /// | `QR_ENDPOINT`            | `https://api.qrserver.com/v1/create-qr-code/`|
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let import_tx_timeout_secs: u64 = std::env::var("IMPORT_TX_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("IMPORT_TX_TIMEOUT_SECS must be a valid u64");

        let qr_endpoint =
            std::env::var("QR_ENDPOINT").unwrap_or_else(|_| DEFAULT_QR_ENDPOINT.into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            import_tx_timeout_secs,
            qr_endpoint,
            jwt,
        }
    }
}
