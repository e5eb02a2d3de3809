//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults. The JWT signing secret is required and is never logged.

use caregate_auth::AuthConfig;
use caregate_db::DbConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Allowed CORS origin for the SPA frontend.
    pub cors_origin: String,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// SurrealDB connection settings.
    pub db: DbConfig,
}

impl ServerConfig {
    /// Loads configuration from environment variables (reads `.env`
    /// if present).
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let host = std::env::var("CAREGATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("CAREGATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);

        let cors_origin = std::env::var("CAREGATE_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        let token_lifetime_secs = std::env::var("CAREGATE_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7_200); // 2 hours

        let jwt_issuer =
            std::env::var("CAREGATE_JWT_ISSUER").unwrap_or_else(|_| "caregate".to_string());

        let pepper = std::env::var("CAREGATE_PEPPER").ok();

        let db = DbConfig {
            url: std::env::var("CAREGATE_DB_URL")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            namespace: std::env::var("CAREGATE_DB_NAMESPACE")
                .unwrap_or_else(|_| "caregate".to_string()),
            database: std::env::var("CAREGATE_DB_DATABASE")
                .unwrap_or_else(|_| "main".to_string()),
            username: std::env::var("CAREGATE_DB_USERNAME")
                .unwrap_or_else(|_| "root".to_string()),
            password: std::env::var("CAREGATE_DB_PASSWORD")
                .unwrap_or_else(|_| "root".to_string()),
        };

        Ok(Self {
            host,
            port,
            cors_origin,
            auth: AuthConfig {
                jwt_secret,
                token_lifetime_secs,
                jwt_issuer,
                pepper,
            },
            db,
        })
    }
}
