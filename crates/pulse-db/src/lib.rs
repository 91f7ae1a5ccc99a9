//! # pulse-db
//!
//! Database layer implementing the pulse-core repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and embedded-at-runtime migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulse_db::{create_pool, run_migrations, DatabaseConfig, PgPulseRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::with_url("postgres://localhost/pulse")).await?;
//!     run_migrations(&pool, "./migrations").await?;
//!     let pulses = PgPulseRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgBookmarkRepository, PgCommentRepository, PgConversationRepository,
    PgDirectMessageRepository, PgFollowRepository, PgMovieRepository, PgNotificationRepository,
    PgPulseRepository, PgReactionRepository, PgStatsRepository, PgUserRepository,
};
