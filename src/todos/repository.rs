use crate::error::ApiError;
use crate::todos::Todo;
use sqlx::PgPool;

/// Repository for database operations on todos
#[derive(Clone)]
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    /// Create a new TodoRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new todo
    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        description: Option<String>,
        category_id: Option<i32>,
    ) -> Result<Todo, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, user_id, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, completed, user_id, category_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(user_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Find a todo by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, category_id, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Find all todos owned by a user, newest first
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<Todo>, ApiError> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, category_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Find a user's todos filed under one category
    pub async fn find_by_user_and_category(
        &self,
        user_id: i32,
        category_id: i32,
    ) -> Result<Vec<Todo>, ApiError> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, category_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1 AND category_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Find a user's todos that have no category
    pub async fn find_uncategorized(&self, user_id: i32) -> Result<Vec<Todo>, ApiError> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, user_id, category_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1 AND category_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Overwrite all mutable fields of a todo, including the category
    /// association. Passing None for category_id detaches the todo.
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        description: Option<String>,
        completed: bool,
        category_id: Option<i32>,
    ) -> Result<Todo, ApiError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = $1, description = $2, completed = $3, category_id = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, title, description, completed, user_id, category_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(category_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Delete a todo
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
