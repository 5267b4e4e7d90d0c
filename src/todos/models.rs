// Todo data models and DTOs

use crate::categories::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A task record owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Todo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Two liters, whole")]
    pub description: Option<String>,
    #[schema(example = false)]
    pub completed: bool,
    pub user_id: i32,
    /// Weak reference; the todo never owns the category's lifecycle
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a todo. The owner is never taken from the client;
/// it is always the authenticated caller.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[validate(length(max = 1000))]
    #[schema(example = "Two liters, whole")]
    pub description: Option<String>,
    /// Must reference a category owned by the caller when present
    #[schema(example = 1)]
    pub category_id: Option<i32>,
}

/// Payload for updating a todo. Updates overwrite all mutable fields;
/// an absent category_id removes the todo from its category.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[validate(length(max = 1000))]
    #[schema(example = "Two liters, whole")]
    pub description: Option<String>,
    #[schema(example = true)]
    pub completed: bool,
    #[schema(example = 1)]
    pub category_id: Option<i32>,
}

/// Optional list filters. category_id and uncategorized are mutually
/// exclusive; category_id wins when both are supplied.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TodoListQuery {
    /// Only todos filed under this category
    pub category_id: Option<i32>,
    /// Only todos with no category
    pub uncategorized: Option<bool>,
}

/// A todo as returned to clients, with its category attached in full
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Two liters, whole")]
    pub description: Option<String>,
    #[schema(example = false)]
    pub completed: bool,
    pub user_id: i32,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoResponse {
    pub fn from_parts(todo: Todo, category: Option<Category>) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            user_id: todo.user_id,
            category,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
