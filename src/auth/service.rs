// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, RegisterRequest, User},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};
use tracing::info;
use validator::Validate;

/// Provider tag stamped on accounts created through password registration
const LOCAL_PROVIDER: &str = "local";

/// Authentication service coordinating registration, login and identity
/// resolution
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Register a new user: hash the password, persist with the local
    /// provider tag, then issue a token for the fresh account.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .user_repo
            .create_user(
                &request.username,
                &request.email,
                &request.name,
                &password_hash,
                LOCAL_PROVIDER,
            )
            .await?;

        info!("Registered user '{}'", user.username);

        let token = self.token_service.issue(&user.username)?;
        Ok(AuthResponse {
            token,
            username: user.username,
            email: user.email,
        })
    }

    /// Login with username and password. Unknown usernames and wrong
    /// passwords collapse into the same InvalidCredentials error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user.username)?;
        Ok(AuthResponse {
            token,
            username: user.username,
            email: user.email,
        })
    }

    /// Resolve a username to the full user record
    pub async fn find_by_username(&self, username: &str) -> Result<User, AuthError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
