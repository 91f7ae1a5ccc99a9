//! # pulse-common
//!
//! Shared utilities including configuration, error handling, bearer-token
//! validation, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, TokenType};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{domain_status, AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
