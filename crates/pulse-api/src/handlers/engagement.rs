//! Engagement handlers
//!
//! Reactions, comments, bookmarks and shares.

use axum::{extract::State, Json};
use pulse_service::dto::{
    BookmarkResponse, CommentResponse, CreateCommentRequest, PageParams, PaginatedResponse,
    ReactionRequest, ReactionToggleResponse, ShareResponse,
};
use pulse_service::EngagementService;

use crate::extractors::{
    AuthUser, IdPairPath, IdPath, OptionalAuthUser, QueryParams, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Default comments per page
const DEFAULT_COMMENT_LIMIT: i64 = 20;

/// Toggle the caller's reaction
///
/// POST /pulse/{id}/reactions
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
    ValidatedJson(request): ValidatedJson<ReactionRequest>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let service = EngagementService::new(state.service_context());
    let response = service.toggle_reaction(auth.user_id, pulse_id, request).await?;
    Ok(Json(response))
}

/// POST /pulse/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = EngagementService::new(state.service_context());
    let comment = service.add_comment(auth.user_id, pulse_id, request).await?;
    Ok(Created(Json(comment)))
}

/// GET /pulse/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    IdPath(pulse_id): IdPath,
    QueryParams(page): QueryParams<PageParams>,
) -> ApiResult<Json<PaginatedResponse<CommentResponse>>> {
    let service = EngagementService::new(state.service_context());
    let comments = service
        .list_comments(pulse_id, viewer.user_id(), page.to_page(DEFAULT_COMMENT_LIMIT))
        .await?;
    Ok(Json(comments))
}

/// DELETE /pulse/{id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPairPath(pulse_id, comment_id): IdPairPath,
) -> ApiResult<NoContent> {
    let service = EngagementService::new(state.service_context());
    service.delete_comment(auth.user_id, pulse_id, comment_id).await?;
    Ok(NoContent)
}

/// POST /pulse/{id}/bookmark
pub async fn bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
) -> ApiResult<Json<BookmarkResponse>> {
    let service = EngagementService::new(state.service_context());
    Ok(Json(service.bookmark(auth.user_id, pulse_id).await?))
}

/// DELETE /pulse/{id}/bookmark
pub async fn unbookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
) -> ApiResult<Json<BookmarkResponse>> {
    let service = EngagementService::new(state.service_context());
    Ok(Json(service.unbookmark(auth.user_id, pulse_id).await?))
}

/// POST /pulse/{id}/share
pub async fn share(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
) -> ApiResult<Json<ShareResponse>> {
    let service = EngagementService::new(state.service_context());
    Ok(Json(service.share(auth.user_id, pulse_id).await?))
}
