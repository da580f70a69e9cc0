//! Server state
//!
//! [`ServerState`] holds the shared handles every handler needs: the
//! configuration, the embedded database and the JWT service. Cloning is
//! cheap (Arc/handle clones).

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{Role, UserCreate};
use crate::db::repository::UserRepository;
use crate::services::ImageStore;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Build state around an existing database handle (tests use this with
    /// the in-memory engine)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize the full server state:
    /// 1. ensure the work directory structure exists
    /// 2. open the on-disk database
    /// 3. create the bootstrap admin account when configured
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("storefront.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let state = Self::with_db(config.clone(), db_service.db);
        state.bootstrap_admin().await?;

        Ok(state)
    }

    /// Create the configured admin account unless it already exists.
    /// Without it a fresh install has no way to reach the admin endpoints
    /// (registration only ever creates the `user` role).
    async fn bootstrap_admin(&self) -> Result<(), AppError> {
        let (Some(email), Some(password)) =
            (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(());
        };

        let users = UserRepository::new(self.db.clone());
        if users
            .find_by_email(email)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Ok(());
        }

        users
            .create(UserCreate {
                name: "Admin".to_string(),
                email: email.clone(),
                password: password.clone(),
                role: Role::Admin,
            })
            .await
            .map_err(AppError::from)?;

        tracing::info!(email = %email, "Bootstrap admin account created");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.config.uploads_dir()
    }

    pub fn image_store(&self) -> ImageStore {
        ImageStore::new(self.uploads_dir())
    }
}
