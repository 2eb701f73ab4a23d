//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scribe_db::entities::{comment, group, post, user};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.error.is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}

/// Empty success response.
#[must_use]
pub fn ok() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// A post as rendered in feeds and detail views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    pub id: String,
    pub user_id: String,
    pub group_id: Option<String>,
    pub text: String,
    pub image_url: Option<String>,
    pub like_count: i32,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<post::Model> for PostItem {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            group_id: p.group_id,
            text: p.text,
            image_url: p.image_url,
            like_count: p.like_count,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// A comment under a post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentItem {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentItem {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Public author profile fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorItem {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub posts_count: i32,
    pub followers_count: i32,
    pub following_count: i32,
}

impl From<user::Model> for AuthorItem {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            posts_count: u.posts_count,
            followers_count: u.followers_count,
            following_count: u.following_count,
        }
    }
}

/// A group as rendered in feeds and listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<group::Model> for GroupItem {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            slug: g.slug,
            description: g.description,
        }
    }
}
