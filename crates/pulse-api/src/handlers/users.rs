//! User handlers
//!
//! Profiles and the follow graph. `{user}` accepts an ID or a username.

use axum::{
    extract::{Path, State},
    Json,
};
use pulse_service::dto::{
    FollowResponse, SuggestedUsersParams, UserProfileResponse, UserStatsResponse,
};
use pulse_service::UserService;

use crate::extractors::{AuthUser, OptionalAuthUser, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/{user}
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(user): Path<String>,
) -> ApiResult<Json<UserProfileResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_profile(&user, viewer.user_id()).await?))
}

/// GET /users/suggested
pub async fn suggested(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    QueryParams(params): QueryParams<SuggestedUsersParams>,
) -> ApiResult<Json<Vec<UserProfileResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.suggested(viewer.user_id(), params.limit).await?))
}

/// GET /users/{user}/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> ApiResult<Json<UserStatsResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_stats(&user).await?))
}

/// POST /users/{user}/follow
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user): Path<String>,
) -> ApiResult<Json<FollowResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.follow(auth.user_id, &user).await?))
}

/// DELETE /users/{user}/follow
pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user): Path<String>,
) -> ApiResult<Json<FollowResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.unfollow(auth.user_id, &user).await?))
}
