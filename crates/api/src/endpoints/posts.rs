//! Post endpoints: detail view, write path, comments, likes.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum::Json;
use scribe_common::AppResult;
use scribe_core::services::{CreatePostInput, EditOutcome, EditPostInput};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{MaybeAuthUser, require_user},
    middleware::AppState,
    response::{self, ApiResponse, CommentItem, PostItem},
};

/// A post with its comments and the author's total post count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostItem,
    pub comments: Vec<CommentItem>,
    pub author_post_count: u64,
    /// Whether the signed-in viewer has liked this post; always false
    /// for anonymous visitors.
    pub liked_by_viewer: bool,
}

/// Post detail: the post, its comments in creation order, and how many
/// posts its author has in total.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    MaybeAuthUser(viewer): MaybeAuthUser,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let detail = state.post_service.post_detail(&id).await?;

    let liked_by_viewer = match &viewer {
        Some(viewer) => state.like_service.has_liked(&id, &viewer.id).await?,
        None => false,
    };

    Ok(ApiResponse::ok(PostDetailResponse {
        post: detail.post.into(),
        comments: detail.comments.into_iter().map(Into::into).collect(),
        author_post_count: detail.author_post_count,
        liked_by_viewer,
    }))
}

/// Create a post.
pub async fn create(
    State(state): State<AppState>,
    maybe_user: MaybeAuthUser,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostItem>> {
    let user = require_user(maybe_user, "/create")?;

    let post = state.post_service.create_post(&user.id, &input).await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Edit a post.
///
/// A non-owner is not an error page: they are sent back to the
/// author's profile, matching the read-only view they should have
/// landed on.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeAuthUser,
    Json(input): Json<EditPostInput>,
) -> AppResult<Response> {
    let user = require_user(maybe_user, &format!("/posts/{id}/edit"))?;

    match state.post_service.edit_post(&id, &user.id, &input).await? {
        EditOutcome::Updated(post) => {
            Ok(ApiResponse::ok(PostItem::from(post)).into_response())
        }
        EditOutcome::NotOwner { author_username } => {
            Ok(Redirect::to(&format!("/profile/{author_username}")).into_response())
        }
    }
}

/// Delete a post. Owner-only.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeAuthUser,
) -> AppResult<Response> {
    let user = require_user(maybe_user, &format!("/posts/{id}/delete"))?;

    state.post_service.delete_post(&id, &user.id).await?;

    Ok(response::ok().into_response())
}

/// Comment payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
}

/// Add a comment, then send the caller back to the post.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeAuthUser,
    Json(req): Json<CommentRequest>,
) -> AppResult<Redirect> {
    let user = require_user(maybe_user, &format!("/posts/{id}/comment"))?;

    state
        .comment_service
        .add_comment(&id, &user.id, &req.text)
        .await?;

    Ok(Redirect::to(&format!("/posts/{id}")))
}

/// Like a post. Idempotent.
pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeAuthUser,
) -> AppResult<Response> {
    let user = require_user(maybe_user, &format!("/posts/{id}/like"))?;

    state.like_service.like(&id, &user.id).await?;

    Ok(response::ok().into_response())
}

/// Remove a like. Idempotent.
pub async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<String>,
    maybe_user: MaybeAuthUser,
) -> AppResult<Response> {
    let user = require_user(maybe_user, &format!("/posts/{id}/unlike"))?;

    state.like_service.unlike(&id, &user.id).await?;

    Ok(response::ok().into_response())
}
