//! Daily activity stats handlers

use axum::{extract::State, Json};
use pulse_service::dto::{DailyStatResponse, StatsRangeParams, StatsRangeResponse};
use pulse_service::StatsService;

use crate::extractors::{AuthUser, IdPath, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/{id}/stats/today
pub async fn today(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<DailyStatResponse>> {
    let service = StatsService::new(state.service_context());
    Ok(Json(service.today(user_id).await?))
}

/// GET /users/{id}/stats/week
pub async fn week(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<StatsRangeResponse>> {
    let service = StatsService::new(state.service_context());
    Ok(Json(service.week(user_id).await?))
}

/// GET /users/{id}/stats/month
pub async fn month(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<StatsRangeResponse>> {
    let service = StatsService::new(state.service_context());
    Ok(Json(service.month(user_id).await?))
}

/// GET /users/{id}/stats/range?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn range(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
    QueryParams(params): QueryParams<StatsRangeParams>,
) -> ApiResult<Json<StatsRangeResponse>> {
    let service = StatsService::new(state.service_context());
    Ok(Json(service.range(user_id, params.start, params.end).await?))
}
