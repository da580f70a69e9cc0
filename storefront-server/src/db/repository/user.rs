//! User Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{User, UserCreate, UserId, UserUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let user: Option<User> = result.take(0)?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let Ok(record_id) = id.parse::<UserId>() else {
            return Ok(None);
        };
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Create a user; the plaintext password is hashed here and never stored
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        let now = now_millis();
        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            hash_pass,
            role: data.role,
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                // unique email index violation backstop (handlers pre-check)
                if msg.contains("idx_user_email") {
                    RepoError::Duplicate("User already exists".to_string())
                } else {
                    RepoError::Database(msg)
                }
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Admin customer update (name/email)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let record_id: UserId = id
            .parse()
            .map_err(|_| RepoError::NotFound("User not found".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.email.is_some() {
            set_parts.push("email = $email");
        }

        if set_parts.is_empty() {
            let user: Option<User> = self.base.db().select(record_id).await?;
            return user.ok_or_else(|| RepoError::NotFound("User not found".to_string()));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("id", record_id))
            .bind(("now", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.email {
            query = query.bind(("email", v));
        }

        let users: Vec<User> = query.await?.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }
}
