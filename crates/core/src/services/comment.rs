//! Comment write path.

use chrono::Utc;
use scribe_common::{AppError, AppResult, IdGenerator};
use scribe_db::entities::comment;
use scribe_db::repositories::{CommentRepository, PostRepository};
use sea_orm::Set;

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post.
    ///
    /// The author is the authenticated caller. The post must exist.
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("text must not be empty".to_string()));
        }

        // Resolve the post first so commenting on a missing post is a 404.
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            user_id: Set(author_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let comment = self.comment_repo.create(model).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Added comment");

        Ok(comment)
    }
}
