//! API endpoints.

mod feeds;
mod groups;
mod posts;
mod social;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::middleware::{AppState, auth_middleware, page_cache_middleware};

/// Create the application router.
///
/// The global index is the only route fronted by the page cache; the
/// auth middleware wraps everything so any handler can see the caller.
pub fn router(state: AppState) -> Router {
    let cached_index = Router::new()
        .route("/", get(feeds::index))
        .route_layer(from_fn_with_state(state.clone(), page_cache_middleware));

    Router::new()
        .merge(cached_index)
        .route("/group/{slug}", get(feeds::group_feed))
        .route("/profile/{username}", get(feeds::profile))
        .route("/follow", get(feeds::following_feed))
        .route("/posts/{id}", get(posts::detail))
        .route("/create", post(posts::create))
        .route("/posts/{id}/edit", post(posts::edit))
        .route("/posts/{id}/delete", post(posts::delete))
        .route("/posts/{id}/comment", post(posts::add_comment))
        .route("/posts/{id}/like", post(posts::like))
        .route("/posts/{id}/unlike", post(posts::unlike))
        .route("/profile/{username}/follow", get(social::follow_author))
        .route("/profile/{username}/unfollow", get(social::unfollow_author))
        .route("/groups", get(groups::list).post(groups::create))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
