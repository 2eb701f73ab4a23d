//! Group service.

use chrono::Utc;
use scribe_common::{AppError, AppResult, IdGenerator};
use scribe_db::entities::group;
use scribe_db::repositories::GroupRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    pub description: String,
}

/// Group service for business logic.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub fn new(group_repo: GroupRepository) -> Self {
        Self {
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a group by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_slug(slug).await
    }

    /// List all groups.
    pub async fn list(&self) -> AppResult<Vec<group::Model>> {
        self.group_repo.list().await
    }

    /// Create a group. Duplicate slugs are a conflict.
    pub async fn create_group(&self, input: &CreateGroupInput) -> AppResult<group::Model> {
        input.validate()?;

        if self.group_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "group slug already taken: {}",
                input.slug
            )));
        }

        let model = group::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.clone()),
            slug: Set(input.slug.clone()),
            description: Set(input.description.clone()),
            created_at: Set(Utc::now().into()),
        };

        let group = self.group_repo.create(model).await?;

        tracing::info!(group_id = %group.id, slug = %group.slug, "Created group");

        Ok(group)
    }
}
