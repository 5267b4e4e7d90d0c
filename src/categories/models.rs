// Category data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A named, colored grouping owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Work")]
    pub name: String,
    /// Display hint, hex format when present
    #[schema(example = "#FF0000")]
    pub color: Option<String>,
    #[schema(example = "Tasks from the office")]
    pub description: Option<String>,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a category. The owner is never taken from the
/// client; it is always the authenticated caller.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Work")]
    pub name: String,
    #[validate(custom = "crate::validation::validate_hex_color")]
    #[schema(example = "#FF0000")]
    pub color: Option<String>,
    #[validate(length(max = 1000))]
    #[schema(example = "Tasks from the office")]
    pub description: Option<String>,
}

/// Payload for updating a category. Updates overwrite all mutable fields,
/// so the shape matches creation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Home")]
    pub name: String,
    #[validate(custom = "crate::validation::validate_hex_color")]
    #[schema(example = "#00FF00")]
    pub color: Option<String>,
    #[schema(example = "Errands and chores")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
