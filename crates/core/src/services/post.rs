//! Post write path: create, edit, delete, detail.

use chrono::Utc;
use scribe_common::{AppError, AppResult, IdGenerator};
use scribe_db::entities::{comment, post};
use scribe_db::repositories::{
    CommentRepository, GroupRepository, PostRepository, UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 8192))]
    pub text: String,
    /// Slug of the group to file the post under.
    pub group: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Input for editing a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditPostInput {
    #[validate(length(min = 1, max = 8192))]
    pub text: String,
    pub group: Option<String>,
}

/// Result of an edit attempt.
#[derive(Debug)]
pub enum EditOutcome {
    /// The editor owned the post and it was updated.
    Updated(post::Model),
    /// The editor is not the author. Callers redirect to the author's
    /// profile rather than answering with an error page.
    NotOwner {
        /// Username of the actual author.
        author_username: String,
    },
}

/// A post together with its comments and author stats.
#[derive(Debug)]
pub struct PostDetail {
    pub post: post::Model,
    pub comments: Vec<comment::Model>,
    /// Total posts by this post's author.
    pub author_post_count: u64,
}

/// Post service for the write path and the detail view.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            group_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve an optional group slug to its ID.
    ///
    /// An unresolvable slug on submit is a validation failure, not a
    /// 404: the form re-renders with a field error and nothing persists.
    async fn resolve_group(&self, slug: Option<&str>) -> AppResult<Option<String>> {
        match slug {
            None => Ok(None),
            Some(s) => {
                let group = self.group_repo.find_by_slug(s).await?.ok_or_else(|| {
                    AppError::Validation(format!("unknown group: {s}"))
                })?;
                Ok(Some(group.id))
            }
        }
    }

    /// Create a post.
    ///
    /// The author is the authenticated caller; it is never taken from
    /// the submitted payload. The creation timestamp is set here, once.
    pub async fn create_post(
        &self,
        author_id: &str,
        input: &CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;
        if input.text.trim().is_empty() {
            return Err(AppError::Validation("text must not be empty".to_string()));
        }

        let group_id = self.resolve_group(input.group.as_deref()).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author_id.to_string()),
            group_id: Set(group_id),
            text: Set(input.text.clone()),
            image_url: Set(input.image_url.clone()),
            like_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let post = self.post_repo.create(model).await?;
        self.user_repo.increment_posts_count(author_id).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Created post");

        Ok(post)
    }

    /// Edit a post's text and group. Only the author may edit.
    pub async fn edit_post(
        &self,
        post_id: &str,
        editor_id: &str,
        input: &EditPostInput,
    ) -> AppResult<EditOutcome> {
        input.validate()?;
        if input.text.trim().is_empty() {
            return Err(AppError::Validation("text must not be empty".to_string()));
        }

        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != editor_id {
            let author = self.user_repo.get_by_id(&post.user_id).await?;
            return Ok(EditOutcome::NotOwner {
                author_username: author.username,
            });
        }

        let group_id = self.resolve_group(input.group.as_deref()).await?;

        let model = post::ActiveModel {
            id: Set(post.id.clone()),
            text: Set(input.text.clone()),
            group_id: Set(group_id),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        let updated = self.post_repo.update(model).await?;

        Ok(EditOutcome::Updated(updated))
    }

    /// Delete a post. Only the author may delete.
    pub async fn delete_post(&self, post_id: &str, requester_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != requester_id {
            return Err(AppError::Forbidden(
                "only the author can delete a post".to_string(),
            ));
        }

        self.post_repo.delete(post_id).await?;
        self.user_repo.decrement_posts_count(&post.user_id).await?;

        tracing::info!(post_id = %post_id, "Deleted post");

        Ok(())
    }

    /// Fetch a post with its comments and the author's post count.
    pub async fn post_detail(&self, post_id: &str) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let comments = self.comment_repo.find_by_post(post_id).await?;
        let author_post_count = self.post_repo.count_by_user(&post.user_id).await?;

        Ok(PostDetail {
            post,
            comments,
            author_post_count,
        })
    }
}
