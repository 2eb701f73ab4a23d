//! User service.
//!
//! Login, registration and session management live in an external
//! collaborator; this service covers the lookups the rest of the
//! application needs, plus bearer-token resolution for the auth
//! middleware.

use scribe_common::{AppError, AppResult};
use scribe_db::entities::user;
use scribe_db::repositories::UserRepository;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Authenticate a user by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::Forbidden("invalid token".to_string()))
    }

    /// Resolve a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }
}
