// Database repository for user records

use crate::auth::{error::AuthError, models::User};
use sqlx::PgPool;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Unique-constraint violations are mapped to a
    /// field-specific conflict by inspecting which constraint fired.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        name: &str,
        password_hash: &str,
        provider: &str,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, name, password_hash, provider) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, username, email, name, password_hash, provider, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(provider)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("users_email_key") => AuthError::EmailTaken,
                        // users_username_key, or an unknown unique index
                        _ => AuthError::UsernameTaken,
                    };
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Find a user by username (exact, case-sensitive)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, name, password_hash, provider, created_at, updated_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}
