//! Follow-graph endpoints.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use scribe_common::AppResult;

use crate::{
    extractors::{MaybeAuthUser, require_user},
    middleware::AppState,
};

/// Start following an author, then return to their profile.
pub async fn follow_author(
    State(state): State<AppState>,
    Path(username): Path<String>,
    maybe_user: MaybeAuthUser,
) -> AppResult<Redirect> {
    let user = require_user(maybe_user, &format!("/profile/{username}/follow"))?;

    state.follow_service.follow(&user.id, &username).await?;

    Ok(Redirect::to(&format!("/profile/{username}")))
}

/// Stop following an author, then return to their profile.
pub async fn unfollow_author(
    State(state): State<AppState>,
    Path(username): Path<String>,
    maybe_user: MaybeAuthUser,
) -> AppResult<Redirect> {
    let user = require_user(maybe_user, &format!("/profile/{username}/unfollow"))?;

    state.follow_service.unfollow(&user.id, &username).await?;

    Ok(Redirect::to(&format!("/profile/{username}")))
}
