//! Group endpoints.

use axum::{Json, extract::State};
use scribe_common::AppResult;
use scribe_core::services::CreateGroupInput;

use crate::{
    extractors::{MaybeAuthUser, require_user},
    middleware::AppState,
    response::{ApiResponse, GroupItem},
};

/// List all groups.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<GroupItem>>> {
    let groups = state.group_service.list().await?;

    Ok(ApiResponse::ok(groups.into_iter().map(Into::into).collect()))
}

/// Create a group. Duplicate slugs are rejected with a conflict.
pub async fn create(
    State(state): State<AppState>,
    maybe_user: MaybeAuthUser,
    Json(input): Json<CreateGroupInput>,
) -> AppResult<ApiResponse<GroupItem>> {
    let _user = require_user(maybe_user, "/groups")?;

    let group = state.group_service.create_group(&input).await?;

    Ok(ApiResponse::ok(group.into()))
}
