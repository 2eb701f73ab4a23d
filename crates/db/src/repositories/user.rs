//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use scribe_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::UsernameLower.eq(username.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by username, returning an error if not found.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    /// Find a user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment posts count atomically (single UPDATE query, no fetch).
    pub async fn increment_posts_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::PostsCount, 1).await
    }

    /// Decrement posts count atomically.
    pub async fn decrement_posts_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::PostsCount, -1).await
    }

    /// Increment followers count atomically.
    pub async fn increment_followers_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::FollowersCount, 1)
            .await
    }

    /// Decrement followers count atomically.
    pub async fn decrement_followers_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::FollowersCount, -1)
            .await
    }

    /// Increment following count atomically.
    pub async fn increment_following_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::FollowingCount, 1)
            .await
    }

    /// Decrement following count atomically.
    pub async fn decrement_following_count(&self, user_id: &str) -> AppResult<()> {
        self.adjust_count(user_id, user::Column::FollowingCount, -1)
            .await
    }

    async fn adjust_count(&self, user_id: &str, column: user::Column, delta: i32) -> AppResult<()> {
        User::update_many()
            .col_expr(column, Expr::col(column).add(delta))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
