//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use pulse_common::{AppConfig, AppError, JwtService};
use pulse_core::SnowflakeGenerator;
use pulse_db::{create_pool, run_migrations};
use pulse_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes skip rate limiting and CORS so orchestrators are never throttled.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    let router = api.merge(apply_middleware(health_routes()));
    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = pulse_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        info!(dir = %config.database.migrations_dir, "Running migrations");
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContext::postgres(pool, jwt_service, snowflake_generator);

    Ok(AppState::new(service_context, config))
}

/// Serve the app on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Listener has no address: {}", e)))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    run_server(app, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pulse_common::{
        AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
        ServerConfig, SnowflakeConfig,
    };
    use pulse_db::PgPool;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        AppConfig {
            app: AppSettings {
                name: "pulse-test".to_string(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                run_migrations: false,
                migrations_dir: "migrations".to_string(),
            },
            jwt: JwtConfig {
                secret: "router-test-secret".to_string(),
                access_token_expiry: 900,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: 100,
                burst: 100,
            },
            cors: CorsConfig {
                allowed_origins: vec![],
            },
            snowflake: SnowflakeConfig { worker_id: 1 },
        }
    }

    /// App over a pool that never connects; only pre-database paths are exercised
    fn test_app() -> Router {
        let config = test_config();
        let pool = PgPool::connect_lazy(&config.database.url).unwrap();
        let context = ServiceContext::postgres(
            pool,
            Arc::new(JwtService::new(&config.jwt.secret, 900)),
            Arc::new(SnowflakeGenerator::new(1)),
        );
        create_app(AppState::new(context, config)).unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let response = test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_create_pulse_without_token() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/pulse")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"contentText": "hi"}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
    }

    #[tokio::test]
    async fn test_bad_token_on_optional_route() {
        let request = Request::builder()
            .uri("/api/v1/pulse/feed")
            .header("authorization", "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_feed_filter() {
        let (status, body) = send(get("/api/v1/pulse?filter=random")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
    }

    #[tokio::test]
    async fn test_non_numeric_pulse_id() {
        let (status, body) = send(get("/api/v1/pulse/not-a-number")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = send(get("/api/v1/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
