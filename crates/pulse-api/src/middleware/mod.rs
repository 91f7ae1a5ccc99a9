//! Middleware stack for the API server
//!
//! Request IDs, HTTP tracing, the 30s timeout, CORS and global rate limiting.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use pulse_common::{AppError, CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request deadline; slower requests get 503
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Request ID, tracing and timeout layers
///
/// Layers run outermost-last, so a request sees: request id, trace, timeout.
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
}

/// Full stack for the API routes: CORS inside, rate limiting outermost
pub fn apply_middleware_with_config(
    router: Router<AppState>,
    rate_limit: &RateLimitConfig,
    cors: &CorsConfig,
    is_production: bool,
) -> Result<Router<AppState>, AppError> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(rate_limit.requests_per_second.into())
            .burst_size(rate_limit.burst)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| {
                AppError::Config("Rate limit must allow at least one request".to_string())
            })?,
    );

    let router = router.layer(create_cors_layer(cors, is_production));
    Ok(apply_middleware(router).layer(GovernorLayer {
        config: governor_conf,
    }))
}

/// CORS from configuration; any origin is allowed only in development with no list
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id_header(),
        ])
        .expose_headers([request_id_header()]);

    if !is_production && config.allowed_origins.is_empty() {
        tracing::warn!("CORS: allowing any origin (development mode)");
        return base_layer.allow_origin(Any);
    }

    if config.allowed_origins.is_empty() {
        tracing::warn!("CORS: no allowed origins configured; browser requests will be blocked");
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!(count = origins.len(), "CORS: allowing configured origins");
    base_layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_rate() {
        let router: Router<AppState> = Router::new();
        let result = apply_middleware_with_config(
            router,
            &RateLimitConfig {
                requests_per_second: 0,
                burst: 0,
            },
            &CorsConfig {
                allowed_origins: vec![],
            },
            false,
        );
        assert!(result.is_err());
    }
}
