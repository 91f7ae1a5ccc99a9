//! Notification handlers

use axum::{extract::State, Json};
use pulse_service::dto::{
    MarkedResponse, NotificationListResponse, NotificationParams, UnreadCountResponse,
};
use pulse_service::NotificationService;

use crate::extractors::{AuthUser, IdPath, QueryParams};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /pulse/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<NotificationParams>,
) -> ApiResult<Json<NotificationListResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.list(auth.user_id, params).await?))
}

/// GET /pulse/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.unread_count(auth.user_id).await?))
}

/// PUT /pulse/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(notification_id): IdPath,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.mark_read(auth.user_id, notification_id).await?;
    Ok(NoContent)
}

/// POST /pulse/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkedResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.mark_all_read(auth.user_id).await?))
}

/// DELETE /pulse/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(notification_id): IdPath,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.delete(auth.user_id, notification_id).await?;
    Ok(NoContent)
}
