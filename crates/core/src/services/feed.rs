//! Feed composition.
//!
//! Builds ordered, paginated post lists for the four feed scopes:
//! the global index, a group's posts, an author's profile, and the
//! following feed of a signed-in user.

use scribe_common::AppResult;
use scribe_db::entities::post;
use scribe_db::repositories::{FollowRepository, GroupRepository, PostRepository, UserRepository};

/// Posts per feed page.
pub const PAGE_SIZE: u64 = 10;

/// The filter context for a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// All posts.
    Global,
    /// Posts filed under the group with this slug.
    Group {
        /// Group slug.
        slug: String,
    },
    /// Posts by the author with this username.
    Profile {
        /// Author username.
        username: String,
    },
    /// Posts by authors the user follows.
    Following {
        /// The signed-in follower.
        user_id: String,
    },
}

/// Pagination metadata for one feed page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number after clamping.
    pub number: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total pages; at least 1 even for an empty feed.
    pub total_pages: u64,
    /// Whether an earlier page exists.
    pub has_previous: bool,
    /// Whether a later page exists.
    pub has_next: bool,
}

impl PageMeta {
    /// Compute page metadata, clamping the requested page into range.
    ///
    /// A request past the last page lands on the last page rather than
    /// an empty result or an error; page 0 is treated as page 1. An
    /// empty feed has exactly one (empty) page.
    #[must_use]
    pub fn clamped(requested: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
        let number = requested.clamp(1, total_pages);

        Self {
            number,
            per_page: PAGE_SIZE,
            total_items,
            total_pages,
            has_previous: number > 1,
            has_next: number < total_pages,
        }
    }

    /// Offset of this page's first item in the full ordering.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }
}

/// One composed feed page.
#[derive(Debug, Clone)]
pub struct FeedPage {
    /// The posts on this page, newest first.
    pub items: Vec<post::Model>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Feed service for composing paginated post lists.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            user_repo,
            follow_repo,
        }
    }

    /// Compose one page of the feed for a scope.
    ///
    /// Read-only. Group and profile scopes resolve their slug/username
    /// first and fail with a not-found error when unknown; the
    /// requested page is clamped into the valid range.
    pub async fn get_feed(&self, scope: &FeedScope, requested_page: u64) -> AppResult<FeedPage> {
        match scope {
            FeedScope::Global => {
                let total = self.post_repo.count_all().await?;
                let meta = PageMeta::clamped(requested_page, total);
                let items = self.post_repo.find_page(PAGE_SIZE, meta.offset()).await?;
                Ok(FeedPage { items, meta })
            }
            FeedScope::Group { slug } => {
                let group = self.group_repo.get_by_slug(slug).await?;
                let total = self.post_repo.count_by_group(&group.id).await?;
                let meta = PageMeta::clamped(requested_page, total);
                let items = self
                    .post_repo
                    .find_by_group(&group.id, PAGE_SIZE, meta.offset())
                    .await?;
                Ok(FeedPage { items, meta })
            }
            FeedScope::Profile { username } => {
                let author = self.user_repo.get_by_username(username).await?;
                let total = self.post_repo.count_by_user(&author.id).await?;
                let meta = PageMeta::clamped(requested_page, total);
                let items = self
                    .post_repo
                    .find_by_user(&author.id, PAGE_SIZE, meta.offset())
                    .await?;
                Ok(FeedPage { items, meta })
            }
            FeedScope::Following { user_id } => {
                let total = self.post_repo.count_by_followed_authors(user_id).await?;
                let meta = PageMeta::clamped(requested_page, total);
                let items = self
                    .post_repo
                    .find_by_followed_authors(user_id, PAGE_SIZE, meta.offset())
                    .await?;
                Ok(FeedPage { items, meta })
            }
        }
    }

    /// Whether `observer` follows `author`.
    ///
    /// Used by the profile view to annotate the page for the current
    /// viewer specifically.
    pub async fn is_following(&self, observer_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(observer_id, author_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scribe_db::entities::{group, user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

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

    fn make_service(db: sea_orm::DatabaseConnection) -> FeedService {
        let db = Arc::new(db);
        FeedService::new(
            PostRepository::new(Arc::clone(&db)),
            GroupRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            FollowRepository::new(db),
        )
    }

    // === PageMeta math ===

    #[test]
    fn test_page_meta_first_page() {
        let meta = PageMeta::clamped(1, 25);
        assert_eq!(meta.number, 1);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.offset(), 0);
        assert!(!meta.has_previous);
        assert!(meta.has_next);
    }

    #[test]
    fn test_page_meta_window_bounds() {
        // Page k covers items [10(k-1), 10k)
        let meta = PageMeta::clamped(2, 25);
        assert_eq!(meta.offset(), 10);
        assert_eq!(meta.per_page, 10);
    }

    #[test]
    fn test_page_meta_overflow_clamps_to_last() {
        let meta = PageMeta::clamped(99, 25);
        assert_eq!(meta.number, 3);
        assert_eq!(meta.offset(), 20);
        assert!(meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_page_meta_zero_clamps_to_first() {
        let meta = PageMeta::clamped(0, 25);
        assert_eq!(meta.number, 1);
    }

    #[test]
    fn test_page_meta_empty_feed_has_one_page() {
        let meta = PageMeta::clamped(1, 0);
        assert_eq!(meta.number, 1);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_page_meta_exact_boundary() {
        // 20 items fill exactly two pages
        let meta = PageMeta::clamped(2, 20);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_page_meta_thirteen_posts() {
        // 13 posts: page 1 holds 10, page 2 holds the remaining 3
        let meta = PageMeta::clamped(2, 13);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.offset(), 10);
        assert_eq!(meta.total_items, 13);
    }

    // === Feed composition ===

    #[tokio::test]
    async fn test_global_feed_first_page() {
        let posts: Vec<post::Model> = (0..3).map(|i| create_test_post(&format!("p{i}"), "u1")).collect();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .append_query_results([posts.clone()])
            .into_connection();

        let service = make_service(db);
        let page = service.get_feed(&FeedScope::Global, 1).await.unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.meta.number, 1);
        assert_eq!(page.meta.total_items, 3);
    }

    #[tokio::test]
    async fn test_group_feed_unknown_slug_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<group::Model>::new()])
            .into_connection();

        let service = make_service(db);
        let result = service
            .get_feed(
                &FeedScope::Group {
                    slug: "other-slug".to_string(),
                },
                1,
            )
            .await;

        assert!(matches!(
            result,
            Err(scribe_common::AppError::GroupNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_profile_feed_unknown_username_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = make_service(db);
        let result = service
            .get_feed(
                &FeedScope::Profile {
                    username: "nobody".to_string(),
                },
                1,
            )
            .await;

        assert!(matches!(
            result,
            Err(scribe_common::AppError::UserNotFound(_))
        ));
    }

    /// Count query result row as SeaORM expects it from `PaginatorTrait`.
    fn count_row(n: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items".to_string(), sea_orm::Value::BigInt(Some(n)));
        row
    }
}
