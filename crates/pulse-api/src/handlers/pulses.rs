//! Pulse handlers
//!
//! Feed, trending topics and pulse create/read/delete.

use axum::{extract::State, Json};
use pulse_service::dto::{
    CreatePulseRequest, FeedParams, PulseResponse, TrendingParams, TrendingTopicResponse,
};
use pulse_service::PulseService;

use crate::extractors::{AuthUser, IdPath, OptionalAuthUser, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Feed page
///
/// GET /pulse, GET /pulse/feed
pub async fn list_feed(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    QueryParams(params): QueryParams<FeedParams>,
) -> ApiResult<Json<Vec<PulseResponse>>> {
    let service = PulseService::new(state.service_context());
    let pulses = service.list_feed(params, viewer.user_id()).await?;
    Ok(Json(pulses))
}

/// GET /pulse/trending-topics
pub async fn trending_topics(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<TrendingParams>,
) -> ApiResult<Json<Vec<TrendingTopicResponse>>> {
    let service = PulseService::new(state.service_context());
    let topics = service.trending_topics(params).await?;
    Ok(Json(topics))
}

/// POST /pulse
pub async fn create_pulse(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePulseRequest>,
) -> ApiResult<Created<Json<PulseResponse>>> {
    let service = PulseService::new(state.service_context());
    let pulse = service.create_pulse(auth.user_id, request).await?;
    Ok(Created(Json(pulse)))
}

/// GET /pulse/{id}
pub async fn get_pulse(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    IdPath(pulse_id): IdPath,
) -> ApiResult<Json<PulseResponse>> {
    let service = PulseService::new(state.service_context());
    let pulse = service.get_pulse(pulse_id, viewer.user_id()).await?;
    Ok(Json(pulse))
}

/// DELETE /pulse/{id}
pub async fn delete_pulse(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(pulse_id): IdPath,
) -> ApiResult<NoContent> {
    let service = PulseService::new(state.service_context());
    service.delete_pulse(auth.user_id, pulse_id).await?;
    Ok(NoContent)
}
