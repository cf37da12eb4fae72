//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_CONNECT_ATTEMPTS, DEFAULT_DATABASE_CONNECT_RETRY_SECONDS,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_connect_attempts: u32,
    pub database_connect_retry: Duration,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Single origin allowed by CORS; `None` allows any origin
    pub cors_allowed_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("database_connect_attempts", &self.database_connect_attempts)
            .field("database_connect_retry", &self.database_connect_retry)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything except the
    /// database URL and the signing secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than
    /// [`MIN_JWT_SECRET_LENGTH`].
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            database_connect_attempts: DEFAULT_DATABASE_CONNECT_ATTEMPTS,
            database_connect_retry: Duration::from_secs(DEFAULT_DATABASE_CONNECT_RETRY_SECONDS),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origin: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;

        config.database_max_connections =
            parse_var("DATABASE_MAX_CONNECTIONS").unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);
        config.database_connect_attempts =
            parse_var("DATABASE_CONNECT_ATTEMPTS").unwrap_or(DEFAULT_DATABASE_CONNECT_ATTEMPTS);
        config.database_connect_retry = Duration::from_secs(
            parse_var("DATABASE_CONNECT_RETRY_SECONDS")
                .unwrap_or(DEFAULT_DATABASE_CONNECT_RETRY_SECONDS),
        );
        config.jwt_expiration_hours =
            parse_var("JWT_EXPIRATION_HOURS").unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS);
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT);
        config.cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read and parse an optional environment variable, ignoring bad values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    #[test]
    fn test_new_applies_defaults() {
        let config = Config::new("sqlite::memory:", SECRET).unwrap();

        assert_eq!(config.jwt_expiration_hours, 72);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_connect_attempts, 10);
        assert_eq!(config.database_connect_retry, Duration::from_secs(2));
        assert!(config.cors_allowed_origin.is_none());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("sqlite::memory:", "short");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@host/db", SECRET).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("pw@host"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_server_addr() {
        let mut config = Config::new("sqlite::memory:", SECRET).unwrap();
        config.server_host = "127.0.0.1".to_string();
        config.server_port = 9000;

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
    }
}
