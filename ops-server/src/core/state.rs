use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::user;

/// Server state shared by every handler
///
/// Cloning is cheap: the pool and JWT service are reference counted.
///
/// | Field | Notes |
/// |-------|-------|
/// | config | immutable after startup |
/// | pool | SQLite connection pool |
/// | jwt_service | token issue and validation |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Open the database, apply migrations and make sure an admin account exists
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;
        let state = Self::new(config.clone(), db.pool);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Create the configured admin account when no admin exists yet
    pub async fn bootstrap_admin(&self) -> Result<()> {
        let created = user::ensure_admin(
            &self.pool,
            &self.config.admin_username,
            &self.config.admin_password,
        )
        .await
        .map_err(|e| crate::core::ServerError::Database(e.to_string()))?;
        if created {
            tracing::info!(username = %self.config.admin_username, "Bootstrap admin account created");
        }
        Ok(())
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
