//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use scribe_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::OnConflict};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user has liked a post.
    pub async fn exists(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let found = Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Insert a like edge, ignoring duplicates.
    ///
    /// Same atomic upsert shape as follow edges; the unique
    /// `(post_id, user_id)` index makes repeat likes a no-op.
    ///
    /// Returns `true` if an edge was actually inserted.
    pub async fn upsert(&self, model: like::ActiveModel) -> AppResult<bool> {
        let rows = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::PostId, like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Delete the like edge for a pair, if present.
    ///
    /// Returns `true` if an edge was removed.
    pub async fn delete_by_pair(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let result = Like::delete_many()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(id: &str, post_id: &str, user_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists_true() {
        let like = create_test_like("l1", "p1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.exists("p1", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_ignores_duplicate() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let model = like::ActiveModel {
            id: sea_orm::Set("l1".to_string()),
            post_id: sea_orm::Set("p1".to_string()),
            user_id: sea_orm::Set("u1".to_string()),
            ..Default::default()
        };

        assert!(!repo.upsert(model).await.unwrap());
    }
}
