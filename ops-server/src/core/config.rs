use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// Minimum JWT secret length accepted outside development
pub const MIN_JWT_SECRET_LEN: usize = 32;

const DEV_JWT_SECRET: &str = "ops-server-development-secret-do-not-deploy";
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | DATABASE_URL | sqlite:data/ops.db | SQLite file, created if missing |
/// | HTTP_PORT | 8080 | |
/// | ENVIRONMENT | development | development, staging or production |
/// | JWT_SECRET | dev secret | required outside development |
/// | JWT_EXPIRATION_MINUTES | 720 | |
/// | ADMIN_USERNAME | admin | bootstrap admin |
/// | ADMIN_PASSWORD | admin123 | required outside development |
/// | LOG_LEVEL | info | used when RUST_LOG is unset |
/// | LOG_DIR | - | enables daily rolling log files |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub admin_username: String,
    pub admin_password: String,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = env_or("ENVIRONMENT", "development");
        let is_dev = environment == "development";

        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Ok(_) if !is_dev => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters"
                )));
            }
            Err(_) if !is_dev => {
                return Err(ServerError::Config(
                    "JWT_SECRET must be set outside development".into(),
                ));
            }
            _ => {
                tracing::warn!("JWT_SECRET not set or too short, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => password,
            _ if !is_dev => {
                return Err(ServerError::Config(
                    "ADMIN_PASSWORD must be set outside development".into(),
                ));
            }
            _ => DEV_ADMIN_PASSWORD.to_string(),
        };

        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite:data/ops.db"),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt: JwtConfig {
                secret,
                expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                    .ok()
                    .and_then(|m| m.parse().ok())
                    .unwrap_or(720),
                ..JwtConfig::default()
            },
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password,
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment,
        })
    }

    /// Configuration for tests: in-memory database, fixed secret
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "test".into(),
            jwt: JwtConfig {
                secret: "test-secret-with-at-least-32-characters!".into(),
                ..JwtConfig::default()
            },
            admin_username: "admin".into(),
            admin_password: DEV_ADMIN_PASSWORD.into(),
            log_level: "debug".into(),
            log_dir: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
