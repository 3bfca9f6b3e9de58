use crate::auth::jwt::JwtConfig;

/// Default ticket validity window in hours.
const DEFAULT_TICKET_VALIDITY_HOURS: i64 = 48;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
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
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Ticket token signing configuration (secret, validity window).
    pub qr: QrConfig,
}

/// Ticket token signing configuration.
#[derive(Debug, Clone)]
pub struct QrConfig {
    /// HMAC-SHA256 secret used to sign and verify ticket tokens.
    pub secret: String,
    /// Fixed validity window from issuance, in hours. Deliberately not tied
    /// to the event's start/end times: a ticket stays scannable somewhat
    /// before and after the nominal event window, but not indefinitely.
    pub validity_hours: i64,
}

impl QrConfig {
    /// Load QR signing configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `QR_SECRET`              | **yes**  | --      |
    /// | `TICKET_VALIDITY_HOURS`  | no       | `48`    |
    ///
    /// # Panics
    ///
    /// Panics if `QR_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("QR_SECRET").expect("QR_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "QR_SECRET must not be empty");

        let validity_hours: i64 = std::env::var("TICKET_VALIDITY_HOURS")
            .unwrap_or_else(|_| DEFAULT_TICKET_VALIDITY_HOURS.to_string())
            .parse()
            .expect("TICKET_VALIDITY_HOURS must be a valid i64");
        assert!(validity_hours > 0, "TICKET_VALIDITY_HOURS must be positive");

        Self {
            secret,
            validity_hours,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
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

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            qr: QrConfig::from_env(),
        }
    }
}
