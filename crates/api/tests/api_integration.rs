//! API integration tests.
//!
//! Each test wires the full router over a `MockDatabase` scripted with
//! exactly the queries the request is expected to run.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use scribe_api::{AppState, router};
use scribe_core::services::{
    CommentService, FeedService, FollowService, GroupService, LikeService, PostService,
    UserService,
};
use scribe_common::{PageCacheError, ResponseCache};
use scribe_db::entities::{comment, group, post, user};
use scribe_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, LikeRepository, PostRepository,
    UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// A `SELECT COUNT(*)` result row.
fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    let mut row = BTreeMap::new();
    row.insert("num_items", Value::BigInt(Some(n)));
    row
}

fn test_user(id: &str, username: &str, token: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        token: Some(token.to_string()),
        name: None,
        bio: None,
        avatar_url: None,
        posts_count: 0,
        followers_count: 0,
        following_count: 0,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_post(id: &str, user_id: &str) -> post::Model {
    post::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        group_id: None,
        text: "Hello".to_string(),
        image_url: None,
        like_count: 0,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Wire the full service stack over one mock connection.
fn state_from(conn: DatabaseConnection) -> AppState {
    let db = Arc::new(conn);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        feed_service: FeedService::new(
            post_repo.clone(),
            group_repo.clone(),
            user_repo.clone(),
            follow_repo.clone(),
        ),
        post_service: PostService::new(
            post_repo.clone(),
            comment_repo.clone(),
            group_repo.clone(),
            user_repo.clone(),
        ),
        comment_service: CommentService::new(comment_repo, post_repo.clone()),
        follow_service: FollowService::new(follow_repo, user_repo),
        like_service: LikeService::new(like_repo, post_repo),
        group_service: GroupService::new(group_repo),
        page_cache: None,
    }
}

fn app_from(db: MockDatabase) -> Router {
    router(state_from(db.into_connection()))
}

/// In-memory stand-in for the Redis page cache.
#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, path_and_query: &str) -> Result<Option<Vec<u8>>, PageCacheError> {
        Ok(self.entries.lock().unwrap().get(path_and_query).cloned())
    }

    async fn set(&self, path_and_query: &str, body: &[u8]) -> Result<(), PageCacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), body.to_vec());
        Ok(())
    }
}

/// A cache whose backend is down: every operation errors.
struct UnreachableCache;

#[async_trait::async_trait]
impl ResponseCache for UnreachableCache {
    async fn get(&self, _path_and_query: &str) -> Result<Option<Vec<u8>>, PageCacheError> {
        Err(PageCacheError::Redis("connection refused".to_string()))
    }

    async fn set(&self, _path_and_query: &str, _body: &[u8]) -> Result<(), PageCacheError> {
        Err(PageCacheError::Redis("connection refused".to_string()))
    }
}

fn app_with_cache(db: MockDatabase, cache: Arc<dyn ResponseCache>) -> Router {
    let mut state = state_from(db.into_connection());
    state.page_cache = Some(cache);
    router(state)
}

#[tokio::test]
async fn test_global_feed_empty_returns_single_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(0)]])
        .append_query_results([Vec::<post::Model>::new()]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["page"]["totalPages"], 1);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_global_feed_non_numeric_page_defaults_to_first() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "u1")]]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["page"]["number"], 1);
}

#[tokio::test]
async fn test_unknown_group_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<group::Model>::new()]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/group/no-such-slug")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_post_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/posts/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_comment_redirects_to_login() {
    // No queries scripted: the request must bounce before touching the DB.
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/posts/p1/comment")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"nice post"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=%2Fposts%2Fp1%2Fcomment"
    );
}

#[tokio::test]
async fn test_anonymous_following_feed_redirects_to_login() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/follow")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=%2Ffollow"
    );
}

#[tokio::test]
async fn test_anonymous_create_post_redirects_to_login() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/create")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"first"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=%2Fcreate"
    );
}

#[tokio::test]
async fn test_follow_redirects_back_to_profile() {
    let viewer = test_user("u1", "alice", "token-alice");
    let author = test_user("u2", "bob", "token-bob");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Token lookup by the auth middleware, then followee resolution.
        .append_query_results([vec![viewer]])
        .append_query_results([vec![author]])
        // Edge insert plus the two counter bumps.
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/profile/bob/follow")
                .header(header::AUTHORIZATION, "Bearer token-alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/profile/bob"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_detail_anonymous_viewer_has_no_like() {
    let reply = comment::Model {
        id: "c1".to_string(),
        post_id: "p1".to_string(),
        user_id: "u2".to_string(),
        text: "nice post".to_string(),
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_post("p1", "u1")]])
        .append_query_results([vec![reply]])
        .append_query_results([vec![count_row(3)]]);

    let response = app_from(db)
        .oneshot(
            Request::builder()
                .uri("/posts/p1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["authorPostCount"], 3);
    assert_eq!(json["data"]["likedByViewer"], false);
    assert_eq!(json["data"]["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_index_second_request_served_from_cache() {
    // The mock holds results for exactly one render; a second trip to
    // the database would come back as a 500.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "u1")]]);

    let app = app_with_cache(db, Arc::new(MemoryCache::default()));

    let first = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = axum::body::to_bytes(first.into_body(), usize::MAX)
        .await
        .unwrap();

    let second = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second_body = axum::body::to_bytes(second.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(first_body, second_body);
    let json: serde_json::Value = serde_json::from_slice(&second_body).unwrap();
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_index_cache_keys_include_query_string() {
    // Page 1 and page 2 render separately even with the cache warm.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(11)]])
        .append_query_results([vec![test_post("p1", "u1")]])
        .append_query_results([vec![count_row(11)]])
        .append_query_results([vec![test_post("p2", "u1")]]);

    let app = app_with_cache(db, Arc::new(MemoryCache::default()));

    let first = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(
            Request::builder()
                .uri("/?page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let body = axum::body::to_bytes(second.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["page"]["number"], 2);
}

#[tokio::test]
async fn test_index_renders_live_when_cache_is_down() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "u1")]]);

    let app = app_with_cache(db, Arc::new(UnreachableCache));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}
