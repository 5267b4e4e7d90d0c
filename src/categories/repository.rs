use crate::categories::Category;
use crate::error::ApiError;
use sqlx::PgPool;

/// Repository for database operations on categories
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new CategoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a category after checking the per-owner name is free. The
    /// check and the insert run in one transaction; the UNIQUE constraint
    /// on (user_id, name) backs the check up against concurrent writers.
    pub async fn create(
        &self,
        user_id: i32,
        name: &str,
        color: Option<String>,
        description: Option<String>,
    ) -> Result<Category, ApiError> {
        let mut tx = self.pool.begin().await?;

        let name_taken: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE user_id = $1 AND name = $2)",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        if name_taken.unwrap_or(false) {
            return Err(ApiError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, color, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, color, description, user_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(color)
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, name))?;

        tx.commit().await?;

        Ok(category)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Category>, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, color, description, user_id, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find all categories owned by a user, newest first
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, color, description, user_id, created_at, updated_at
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Overwrite all mutable fields of a category. Renaming onto another
    /// category of the same owner is a conflict; renaming onto the
    /// category's own current name is not.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        name: &str,
        color: Option<String>,
        description: Option<String>,
    ) -> Result<Category, ApiError> {
        let mut tx = self.pool.begin().await?;

        let name_taken: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE user_id = $1 AND name = $2 AND id != $3)",
        )
        .bind(user_id)
        .bind(name)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if name_taken.unwrap_or(false) {
            return Err(ApiError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, color = $2, description = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, color, description, user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(color)
        .bind(description)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, name))?;

        tx.commit().await?;

        Ok(category)
    }

    /// Delete a category, detaching its todos first. The todos survive
    /// uncategorized; both statements commit together or not at all.
    pub async fn delete_detaching_todos(&self, id: i32) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE todos SET category_id = NULL WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    fn map_unique_violation(error: sqlx::Error, name: &str) -> ApiError {
        if let sqlx::Error::Database(ref db_err) = error {
            if db_err.is_unique_violation() {
                return ApiError::Conflict(format!("Category '{}' already exists", name));
            }
        }
        ApiError::DatabaseError(error)
    }
}
