mod auth;
mod categories;
mod db;
mod error;
mod todos;
mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, TokenService, UserRepository};
use categories::{CategoryRepository, CategoryService};
use todos::{TodoRepository, TodoService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        todos::handlers::list_todos_handler,
        todos::handlers::get_todo_handler,
        todos::handlers::create_todo_handler,
        todos::handlers::update_todo_handler,
        todos::handlers::delete_todo_handler,
        categories::handlers::list_categories_handler,
        categories::handlers::get_category_handler,
        categories::handlers::create_category_handler,
        categories::handlers::update_category_handler,
        categories::handlers::delete_category_handler,
    ),
    components(
        schemas(
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::AuthResponse,
            auth::models::UserResponse,
            todos::models::Todo,
            todos::models::CreateTodoRequest,
            todos::models::UpdateTodoRequest,
            todos::models::TodoResponse,
            categories::models::Category,
            categories::models::CreateCategoryRequest,
            categories::models::UpdateCategoryRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login endpoints"),
        (name = "todos", description = "Per-user todo management endpoints"),
        (name = "categories", description = "Per-user category management endpoints")
    ),
    info(
        title = "Todo API",
        version = "1.0.0",
        description = "RESTful API for multi-user todo tracking"
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_service: TokenService,
    pub user_repository: UserRepository,
    pub auth_service: AuthService,
    pub todo_service: TodoService,
    pub category_service: CategoryService,
}

/// Wires repositories and services over one pool
pub fn build_state(db: PgPool, jwt_secret: String, jwt_expiration: i64) -> AppState {
    let token_service = TokenService::new(jwt_secret, jwt_expiration);
    let user_repository = UserRepository::new(db.clone());
    let auth_service = AuthService::new(user_repository.clone(), token_service.clone());

    let category_repository = CategoryRepository::new(db.clone());
    let category_service =
        CategoryService::new(category_repository.clone(), user_repository.clone());

    let todo_repository = TodoRepository::new(db.clone());
    let todo_service = TodoService::new(
        todo_repository,
        category_repository,
        user_repository.clone(),
    );

    AppState {
        db,
        token_service,
        user_repository,
        auth_service,
        todo_service,
        category_service,
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    // A configured origin restricts CORS; without one stay permissive (dev)
    let cors = match std::env::var("CORS_ALLOWED_ORIGIN")
        .ok()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        // Protected routes; each handler requires an AuthenticatedUser
        .route("/api/todos", get(todos::list_todos_handler))
        .route("/api/todos", post(todos::create_todo_handler))
        .route("/api/todos/:id", get(todos::get_todo_handler))
        .route("/api/todos/:id", put(todos::update_todo_handler))
        .route("/api/todos/:id", delete(todos::delete_todo_handler))
        .route("/api/categories", get(categories::list_categories_handler))
        .route("/api/categories", post(categories::create_category_handler))
        .route("/api/categories/:id", get(categories::get_category_handler))
        .route("/api/categories/:id", put(categories::update_category_handler))
        .route(
            "/api/categories/:id",
            delete(categories::delete_category_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Todo API - Starting...");

    // Get configuration from environment variables
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let jwt_expiration = std::env::var("JWT_EXPIRATION")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(3600);
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(build_state(db_pool, jwt_secret, jwt_expiration));

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Todo API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
