//! Follow service (directed subscription edges).

use chrono::Utc;
use scribe_common::{AppResult, IdGenerator};
use scribe_db::entities::follow;
use scribe_db::repositories::{FollowRepository, UserRepository};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author by username.
    ///
    /// Self-follow is silently ignored. Idempotent: the storage-layer
    /// unique index makes a repeat follow a no-op, and the denormalized
    /// counters move only when an edge was actually inserted.
    pub async fn follow(&self, follower_id: &str, followee_username: &str) -> AppResult<()> {
        let followee = self.user_repo.get_by_username(followee_username).await?;

        if follower_id == followee.id {
            tracing::debug!(user_id = %follower_id, "Ignoring self-follow");
            return Ok(());
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee.id.clone()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = self.follow_repo.upsert(model).await?;

        if inserted {
            self.user_repo.increment_following_count(follower_id).await?;
            self.user_repo
                .increment_followers_count(&followee.id)
                .await?;
            tracing::info!(follower_id = %follower_id, followee_id = %followee.id, "Created follow edge");
        }

        Ok(())
    }

    /// Unfollow an author by username. No-op if no edge exists.
    pub async fn unfollow(&self, follower_id: &str, followee_username: &str) -> AppResult<()> {
        let followee = self.user_repo.get_by_username(followee_username).await?;

        let removed = self
            .follow_repo
            .delete_by_pair(follower_id, &followee.id)
            .await?;

        if removed {
            self.user_repo.decrement_following_count(follower_id).await?;
            self.user_repo
                .decrement_followers_count(&followee.id)
                .await?;
            tracing::info!(follower_id = %follower_id, followee_id = %followee.id, "Removed follow edge");
        }

        Ok(())
    }

    /// Whether `observer` follows `author`.
    pub async fn is_following(&self, observer_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(observer_id, author_id).await
    }
}
