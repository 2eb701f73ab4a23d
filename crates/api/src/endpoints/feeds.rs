//! Feed endpoints: global index, group, profile, and following feeds.

use axum::extract::{Path, Query, State};
use scribe_common::AppResult;
use scribe_core::services::{FeedScope, PageMeta};
use serde::Serialize;

use crate::{
    extractors::{MaybeAuthUser, PageQuery, require_user},
    middleware::AppState,
    response::{ApiResponse, AuthorItem, GroupItem, PostItem},
};

/// One page of a feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<PostItem>,
    pub page: PageMeta,
}

/// A group feed page with the group's own fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFeedResponse {
    pub group: GroupItem,
    pub items: Vec<PostItem>,
    pub page: PageMeta,
}

/// A profile page: the author, whether the viewer follows them, and
/// the author's posts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub author: AuthorItem,
    pub following: bool,
    pub items: Vec<PostItem>,
    pub page: PageMeta,
}

/// Global feed, newest first.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<FeedResponse>> {
    let page = state
        .feed_service
        .get_feed(&FeedScope::Global, query.number())
        .await?;

    Ok(ApiResponse::ok(FeedResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        page: page.meta,
    }))
}

/// Posts filed under one group.
pub async fn group_feed(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<GroupFeedResponse>> {
    let group = state.group_service.get_by_slug(&slug).await?;
    let page = state
        .feed_service
        .get_feed(&FeedScope::Group { slug }, query.number())
        .await?;

    Ok(ApiResponse::ok(GroupFeedResponse {
        group: group.into(),
        items: page.items.into_iter().map(Into::into).collect(),
        page: page.meta,
    }))
}

/// An author's profile with their posts.
///
/// The `following` flag is specific to the viewer: it reports whether
/// the signed-in caller follows this author, and is always false for
/// anonymous visitors and for one's own profile.
pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let author = state.user_service.get_by_username(&username).await?;

    let following = match &viewer {
        Some(viewer) if viewer.id != author.id => {
            state.follow_service.is_following(&viewer.id, &author.id).await?
        }
        _ => false,
    };

    let page = state
        .feed_service
        .get_feed(&FeedScope::Profile { username }, query.number())
        .await?;

    Ok(ApiResponse::ok(ProfileResponse {
        author: author.into(),
        following,
        items: page.items.into_iter().map(Into::into).collect(),
        page: page.meta,
    }))
}

/// Posts by the authors the caller follows.
pub async fn following_feed(
    State(state): State<AppState>,
    maybe_user: MaybeAuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<FeedResponse>> {
    let user = require_user(maybe_user, "/follow")?;

    let page = state
        .feed_service
        .get_feed(&FeedScope::Following { user_id: user.id }, query.number())
        .await?;

    Ok(ApiResponse::ok(FeedResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        page: page.meta,
    }))
}
