//! Post repository.
//!
//! Carries the feed queries: every feed scope boils down to a filtered,
//! counted, offset-paginated window over posts ordered newest first.

use std::sync::Arc;

use crate::entities::{Post, follow, post};
use scribe_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Query, SelectStatement},
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Comments and likes cascade at the storage layer.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Adjust the denormalized like count atomically.
    pub async fn adjust_like_count(&self, post_id: &str, delta: i32) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::LikeCount,
                Expr::col(post::Column::LikeCount).add(delta),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Feed queries ====================

    /// Feed ordering: creation timestamp descending, ties broken by ID
    /// ascending. IDs are ULIDs, so the tie-break is insertion order.
    fn ordered(query: Select<Post>) -> Select<Post> {
        query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
    }

    /// Count all posts.
    pub async fn count_all(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a window of the global feed.
    pub async fn find_page(&self, limit: u64, offset: u64) -> AppResult<Vec<post::Model>> {
        Self::ordered(Post::find())
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts filed under a group.
    pub async fn count_by_group(&self, group_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a window of a group's feed.
    pub async fn find_by_group(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Self::ordered(Post::find().filter(post::Column::GroupId.eq(group_id)))
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by an author.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a window of an author's feed.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Self::ordered(Post::find().filter(post::Column::UserId.eq(user_id)))
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Subquery selecting the authors a user follows.
    fn followed_authors(follower_id: &str) -> SelectStatement {
        Query::select()
            .column(follow::Column::FolloweeId)
            .from(follow::Entity)
            .and_where(Expr::col(follow::Column::FollowerId).eq(follower_id))
            .to_owned()
    }

    /// Count posts whose author is followed by the given user.
    pub async fn count_by_followed_authors(&self, follower_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::UserId.in_subquery(Self::followed_authors(follower_id)))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a window of the following feed for a user.
    pub async fn find_by_followed_authors(
        &self,
        follower_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Self::ordered(
            Post::find()
                .filter(post::Column::UserId.in_subquery(Self::followed_authors(follower_id))),
        )
        .limit(limit)
        .offset(offset)
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            group_id: None,
            text: "Test post".to_string(),
            image_url: None,
            like_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post("p1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_page_returns_window() {
        let p1 = create_test_post("p1", "u1");
        let p2 = create_test_post("p2", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_page(10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_group_window() {
        let p1 = create_test_post("p1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_group("g1", 10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
