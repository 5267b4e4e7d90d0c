use crate::auth::{User, UserRepository};
use crate::categories::{
    Category, CategoryRepository, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::error::ApiError;
use validator::Validate;

/// Service layer for category business logic
#[derive(Clone)]
pub struct CategoryService {
    repository: CategoryRepository,
    user_repository: UserRepository,
}

impl CategoryService {
    /// Create a new CategoryService
    pub fn new(repository: CategoryRepository, user_repository: UserRepository) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    /// Resolve the authenticated username to its user record. A missing
    /// record here is a consistency failure, not a client error.
    async fn resolve_principal(&self, username: &str) -> Result<User, ApiError> {
        self.user_repository
            .find_by_username(username)
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?
            .ok_or_else(|| ApiError::PrincipalNotFound(username.to_string()))
    }

    /// List all categories owned by the caller
    pub async fn list_categories(&self, username: &str) -> Result<Vec<Category>, ApiError> {
        let user = self.resolve_principal(username).await?;
        self.repository.find_by_user(user.id).await
    }

    /// Fetch a single category the caller owns
    pub async fn get_category(&self, username: &str, category_id: i32) -> Result<Category, ApiError> {
        let user = self.resolve_principal(username).await?;

        let category = self
            .repository
            .find_by_id(category_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Category".to_string(),
                id: category_id,
            })?;

        if category.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        Ok(category)
    }

    /// Create a new category owned by the caller
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Resolves the caller to a user record
    /// 3. Creates the category, rejecting a name the caller already uses
    pub async fn create_category(
        &self,
        username: &str,
        request: CreateCategoryRequest,
    ) -> Result<Category, ApiError> {
        request.validate()?;

        let user = self.resolve_principal(username).await?;

        let category = self
            .repository
            .create(user.id, &request.name, request.color, request.description)
            .await?;

        tracing::info!(
            category_id = category.id,
            user_id = user.id,
            "Category created"
        );

        Ok(category)
    }

    /// Overwrite a category the caller owns
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Fetches the existing category
    /// 3. Verifies the caller owns it
    /// 4. Applies the update, rejecting a rename onto another of the
    ///    caller's category names
    pub async fn update_category(
        &self,
        username: &str,
        category_id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<Category, ApiError> {
        request.validate()?;

        let user = self.resolve_principal(username).await?;

        let existing = self
            .repository
            .find_by_id(category_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Category".to_string(),
                id: category_id,
            })?;

        if existing.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        self.repository
            .update(
                category_id,
                user.id,
                &request.name,
                request.color,
                request.description,
            )
            .await
    }

    /// Delete a category the caller owns. Todos referencing it are
    /// detached, not deleted.
    pub async fn delete_category(&self, username: &str, category_id: i32) -> Result<(), ApiError> {
        let user = self.resolve_principal(username).await?;

        let existing = self
            .repository
            .find_by_id(category_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Category".to_string(),
                id: category_id,
            })?;

        if existing.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        self.repository.delete_detaching_todos(category_id).await?;

        tracing::info!(category_id, user_id = user.id, "Category deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    /// Connects to the test database, or returns None so the test skips
    /// when TEST_DATABASE_URL is not configured.
    async fn create_test_pool() -> Option<PgPool> {
        let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(pool)
    }

    /// Inserts a user with a unique username and returns (id, username)
    async fn create_test_user(pool: &PgPool) -> (i32, String) {
        let username = crate::test_support::unique_username("catsvc");
        let email = format!("{}@example.com", username);

        let row: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&username)
        .bind(email)
        .bind("Test User")
        .bind("test_hash")
        .fetch_one(pool)
        .await
        .expect("Failed to create test user");

        (row.0, username)
    }

    fn create_service(pool: PgPool) -> CategoryService {
        let repository = CategoryRepository::new(pool.clone());
        let user_repository = UserRepository::new(pool);
        CategoryService::new(repository, user_repository)
    }

    fn work_request() -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: "Work".to_string(),
            color: Some("#FF0000".to_string()),
            description: Some("Office tasks".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_category_success() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (user_id, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create category");

        assert_eq!(category.name, "Work");
        assert_eq!(category.color, Some("#FF0000".to_string()));
        assert_eq!(category.user_id, user_id);
    }

    #[tokio::test]
    async fn test_create_category_duplicate_name_conflict() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create first category");

        let result = service.create_category(&username, work_request()).await;

        match result {
            Err(ApiError::Conflict(message)) => {
                assert!(message.contains("Work"));
            }
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_same_name_allowed_for_different_users() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, alice) = create_test_user(&pool).await;
        let (_, bob) = create_test_user(&pool).await;
        let service = create_service(pool);

        service
            .create_category(&alice, work_request())
            .await
            .expect("Failed to create alice's category");

        service
            .create_category(&bob, work_request())
            .await
            .expect("Bob should be able to reuse the name");
    }

    #[tokio::test]
    async fn test_create_category_invalid_color_rejected() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        let request = CreateCategoryRequest {
            name: "Work".to_string(),
            color: Some("red".to_string()),
            description: None,
        };

        let result = service.create_category(&username, request).await;

        match result {
            Err(ApiError::ValidationError(_)) => (),
            _ => panic!("Expected ValidationError"),
        }
    }

    #[tokio::test]
    async fn test_list_categories_returns_only_own() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (alice_id, alice) = create_test_user(&pool).await;
        let (_, bob) = create_test_user(&pool).await;
        let service = create_service(pool);

        service
            .create_category(&alice, work_request())
            .await
            .expect("Failed to create alice's category");
        service
            .create_category(
                &bob,
                CreateCategoryRequest {
                    name: "Home".to_string(),
                    color: None,
                    description: None,
                },
            )
            .await
            .expect("Failed to create bob's category");

        let categories = service
            .list_categories(&alice)
            .await
            .expect("Failed to list categories");

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Work");
        assert!(categories.iter().all(|c| c.user_id == alice_id));
    }

    #[tokio::test]
    async fn test_get_category_not_found() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        let result = service.get_category(&username, 99999).await;

        match result {
            Err(ApiError::NotFound { resource, id }) => {
                assert_eq!(resource, "Category");
                assert_eq!(id, 99999);
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_get_category_of_other_user_forbidden() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, alice) = create_test_user(&pool).await;
        let (_, bob) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&alice, work_request())
            .await
            .expect("Failed to create category");

        let result = service.get_category(&bob, category.id).await;

        match result {
            Err(ApiError::NotOwner) => (),
            _ => panic!("Expected NotOwner error"),
        }
    }

    #[tokio::test]
    async fn test_update_category_success() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create category");

        let updated = service
            .update_category(
                &username,
                category.id,
                UpdateCategoryRequest {
                    name: "Office".to_string(),
                    color: Some("#00FF00".to_string()),
                    description: None,
                },
            )
            .await
            .expect("Failed to update category");

        assert_eq!(updated.name, "Office");
        assert_eq!(updated.color, Some("#00FF00".to_string()));
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, category.created_at);
    }

    #[tokio::test]
    async fn test_update_category_keeping_own_name_is_not_conflict() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create category");

        service
            .update_category(
                &username,
                category.id,
                UpdateCategoryRequest {
                    name: "Work".to_string(),
                    color: Some("#0000FF".to_string()),
                    description: None,
                },
            )
            .await
            .expect("Keeping the current name should not conflict");
    }

    #[tokio::test]
    async fn test_update_category_rename_onto_existing_conflicts() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, username) = create_test_user(&pool).await;
        let service = create_service(pool);

        service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create first category");
        let home = service
            .create_category(
                &username,
                CreateCategoryRequest {
                    name: "Home".to_string(),
                    color: None,
                    description: None,
                },
            )
            .await
            .expect("Failed to create second category");

        let result = service
            .update_category(
                &username,
                home.id,
                UpdateCategoryRequest {
                    name: "Work".to_string(),
                    color: None,
                    description: None,
                },
            )
            .await;

        match result {
            Err(ApiError::Conflict(_)) => (),
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_update_category_of_other_user_forbidden() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, alice) = create_test_user(&pool).await;
        let (_, bob) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&alice, work_request())
            .await
            .expect("Failed to create category");

        let result = service
            .update_category(
                &bob,
                category.id,
                UpdateCategoryRequest {
                    name: "Hijacked".to_string(),
                    color: None,
                    description: None,
                },
            )
            .await;

        match result {
            Err(ApiError::NotOwner) => (),
            _ => panic!("Expected NotOwner error"),
        }
    }

    #[tokio::test]
    async fn test_delete_category_detaches_todos() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (user_id, username) = create_test_user(&pool).await;
        let service = create_service(pool.clone());

        let category = service
            .create_category(&username, work_request())
            .await
            .expect("Failed to create category");

        let todo_id: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO todos (title, user_id, category_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind("Buy milk")
        .bind(user_id)
        .bind(category.id)
        .fetch_one(&pool)
        .await
        .expect("Failed to create todo");

        service
            .delete_category(&username, category.id)
            .await
            .expect("Failed to delete category");

        let remaining: Option<(Option<i32>,)> =
            sqlx::query_as("SELECT category_id FROM todos WHERE id = $1")
                .bind(todo_id.0)
                .fetch_optional(&pool)
                .await
                .expect("Failed to fetch todo");

        match remaining {
            Some((category_id,)) => assert_eq!(category_id, None),
            None => panic!("Todo should survive category deletion"),
        }

        let gone = service.get_category(&username, category.id).await;
        match gone {
            Err(ApiError::NotFound { .. }) => (),
            _ => panic!("Expected NotFound after deletion"),
        }
    }

    #[tokio::test]
    async fn test_delete_category_of_other_user_forbidden() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let (_, alice) = create_test_user(&pool).await;
        let (_, bob) = create_test_user(&pool).await;
        let service = create_service(pool);

        let category = service
            .create_category(&alice, work_request())
            .await
            .expect("Failed to create category");

        let result = service.delete_category(&bob, category.id).await;

        match result {
            Err(ApiError::NotOwner) => (),
            _ => panic!("Expected NotOwner error"),
        }

        service
            .get_category(&alice, category.id)
            .await
            .expect("Category should still exist");
    }

    #[tokio::test]
    async fn test_unknown_principal_is_internal_failure() {
        let Some(pool) = create_test_pool().await else {
            return;
        };
        let service = create_service(pool);

        let result = service.list_categories("no_such_user_anywhere").await;

        match result {
            Err(ApiError::PrincipalNotFound(username)) => {
                assert_eq!(username, "no_such_user_anywhere");
            }
            _ => panic!("Expected PrincipalNotFound error"),
        }
    }
}
