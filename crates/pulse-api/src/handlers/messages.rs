//! Direct messaging handlers

use axum::{extract::State, Json};
use pulse_service::dto::{
    ConversationResponse, CreateConversationRequest, MessageResponse, PageParams,
    PaginatedResponse, SendMessageRequest, UnreadCountResponse,
};
use pulse_service::services::{DEFAULT_CONVERSATION_LIMIT, DEFAULT_MESSAGE_LIMIT};
use pulse_service::MessagingService;

use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Create a conversation, or return the existing one with the same members
///
/// POST /messages/conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateConversationRequest>,
) -> ApiResult<Created<Json<ConversationResponse>>> {
    let service = MessagingService::new(state.service_context());
    let conversation = service.create_conversation(auth.user_id, request).await?;
    Ok(Created(Json(conversation)))
}

/// GET /messages/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(page): QueryParams<PageParams>,
) -> ApiResult<Json<PaginatedResponse<ConversationResponse>>> {
    let service = MessagingService::new(state.service_context());
    let conversations = service
        .list_conversations(auth.user_id, page.to_page(DEFAULT_CONVERSATION_LIMIT))
        .await?;
    Ok(Json(conversations))
}

/// GET /messages/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
) -> ApiResult<Json<ConversationResponse>> {
    let service = MessagingService::new(state.service_context());
    Ok(Json(service.get_conversation(auth.user_id, conversation_id).await?))
}

/// Leave a conversation
///
/// DELETE /messages/conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MessagingService::new(state.service_context());
    service.delete_conversation(auth.user_id, conversation_id).await?;
    Ok(NoContent)
}

/// POST /messages/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessagingService::new(state.service_context());
    let message = service
        .send_message(auth.user_id, conversation_id, request)
        .await?;
    Ok(Created(Json(message)))
}

/// GET /messages/conversations/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
    QueryParams(page): QueryParams<PageParams>,
) -> ApiResult<Json<PaginatedResponse<MessageResponse>>> {
    let service = MessagingService::new(state.service_context());
    let messages = service
        .get_messages(
            auth.user_id,
            conversation_id,
            page.to_page(DEFAULT_MESSAGE_LIMIT),
        )
        .await?;
    Ok(Json(messages))
}

/// PUT /messages/conversations/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MessagingService::new(state.service_context());
    service.mark_read(auth.user_id, conversation_id).await?;
    Ok(NoContent)
}

/// DELETE /messages/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MessagingService::new(state.service_context());
    service.delete_message(auth.user_id, message_id).await?;
    Ok(NoContent)
}

/// GET /messages/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let service = MessagingService::new(state.service_context());
    Ok(Json(service.unread_count(auth.user_id).await?))
}
