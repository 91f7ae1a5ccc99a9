//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, seeding users, and making
//! HTTP requests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Result;
use pulse_api::{create_app, create_app_state, AppState};
use pulse_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
    ServerConfig, SnowflakeConfig,
};
use pulse_core::entities::User;
use pulse_core::traits::UserRepository;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::TestUser;

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19000);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let mut config = test_config()?;
        // Servers run in parallel against one database; keep their ID spaces apart
        config.snowflake.worker_id = config.api.port % 1024;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], config.api.port));

        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    /// Insert a user directly and mint an access token for it
    ///
    /// Accounts are owned by an external auth service, so there is no
    /// registration endpoint to go through.
    pub async fn create_user(&self) -> Result<TestUser> {
        let context = self.state.service_context();
        let id = context.generate_id();
        let username = format!("tester_{}", id.into_inner());

        let user = User::new(id, username.clone());
        context.user_repo().create(&user).await?;
        let token = self.state.jwt_service().issue_access_token(id)?;

        Ok(TestUser {
            id: id.to_string(),
            username,
            token,
        })
    }

    /// GET outside the versioned prefix (health probes)
    pub async fn get_root(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.url(path)), token).await
    }

    /// Make a POST request with JSON body and no token
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.post(self.url(path)).json(body), token).await
    }

    /// Make a POST request with auth token and an empty body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.post(self.url(path)), token).await
    }

    /// Make a PUT request with auth token and an empty body
    pub async fn put_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.put(self.url(path)), token).await
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.delete(self.url(path)), token).await
    }
}

async fn send(request: RequestBuilder, token: &str) -> Result<Response> {
    Ok(request
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?)
}

/// Create a test configuration
///
/// Only `DATABASE_URL` and `JWT_SECRET` come from the environment; the
/// rest is fixed so tests never trip the rate limiter.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    Ok(AppConfig {
        app: AppSettings {
            name: "pulse-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: get_test_port(),
        },
        database: DatabaseConfig {
            url: std::env::var("DATABASE_URL")?,
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
            migrations_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../../migrations").to_string(),
        },
        jwt: JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            access_token_expiry: 900,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: vec![],
        },
        snowflake: SnowflakeConfig { worker_id: 1 },
    })
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("JWT_SECRET").is_err() {
        eprintln!("Skipping test: JWT_SECRET not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
