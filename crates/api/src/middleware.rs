//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use scribe_common::ResponseCache;
use scribe_core::services::{
    CommentService, FeedService, FollowService, GroupService, LikeService, PostService,
    UserService,
};
use std::sync::Arc;

/// Largest response body the page cache will store.
const MAX_CACHED_BODY: usize = 1024 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// User lookup and token authentication.
    pub user_service: UserService,
    /// Feed composition.
    pub feed_service: FeedService,
    /// Post write path and detail view.
    pub post_service: PostService,
    /// Comment write path.
    pub comment_service: CommentService,
    /// Follow graph.
    pub follow_service: FollowService,
    /// Like edges.
    pub like_service: LikeService,
    /// Group lookup and creation.
    pub group_service: GroupService,
    /// Short-TTL page cache; `None` disables caching.
    pub page_cache: Option<Arc<dyn ResponseCache>>,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a user and stores the model in request
/// extensions; extraction failures leave the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Page cache middleware.
///
/// Keyed by path plus query string, never by caller identity: every
/// visitor shares the same cached page for the TTL. Only successful
/// responses are stored; cache failures degrade to a live render.
pub async fn page_cache_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(cache) = state.page_cache else {
        return next.run(req).await;
    };

    let key = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);

    match cache.get(&key).await {
        Ok(Some(body)) => {
            return ([(header::CONTENT_TYPE, "application/json")], body).into_response();
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, key = %key, "Page cache read failed"),
    }

    let response = next.run(req).await;
    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
        Ok(bytes) => {
            if let Err(e) = cache.set(&key, &bytes).await {
                tracing::warn!(error = %e, key = %key, "Page cache write failed");
            }
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer response for page cache");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
