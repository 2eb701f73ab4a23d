//! Like service.
//!
//! Likes are idempotent edges with a unique `(post, user)` index and a
//! denormalized count on the post, the same shape as follow edges.

use chrono::Utc;
use scribe_common::{AppResult, IdGenerator};
use scribe_db::entities::like;
use scribe_db::repositories::{LikeRepository, PostRepository};
use sea_orm::Set;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub fn new(like_repo: LikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a post. Idempotent; the post must exist.
    pub async fn like(&self, post_id: &str, user_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = self.like_repo.upsert(model).await?;

        if inserted {
            self.post_repo.adjust_like_count(&post.id, 1).await?;
            tracing::debug!(post_id = %post.id, user_id = %user_id, "Liked post");
        }

        Ok(())
    }

    /// Remove a like. No-op if the user had not liked the post.
    pub async fn unlike(&self, post_id: &str, user_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let removed = self.like_repo.delete_by_pair(&post.id, user_id).await?;

        if removed {
            self.post_repo.adjust_like_count(&post.id, -1).await?;
            tracing::debug!(post_id = %post.id, user_id = %user_id, "Unliked post");
        }

        Ok(())
    }

    /// Whether a user has liked a post.
    pub async fn has_liked(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        self.like_repo.exists(post_id, user_id).await
    }
}
