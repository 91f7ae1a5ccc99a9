//! Service context - dependency container for services
//!
//! Holds all repositories and other dependencies needed by services.

use std::sync::Arc;

use pulse_common::JwtService;
use pulse_core::traits::{
    BookmarkRepository, CommentRepository, ConversationRepository, DirectMessageRepository,
    FollowRepository, MovieRepository, NotificationRepository, PulseRepository,
    ReactionRepository, StatsRepository, UserRepository,
};
use pulse_core::{Snowflake, SnowflakeGenerator};
use pulse_db::{
    PgBookmarkRepository, PgCommentRepository, PgConversationRepository,
    PgDirectMessageRepository, PgFollowRepository, PgMovieRepository, PgNotificationRepository,
    PgPool, PgPulseRepository, PgReactionRepository, PgStatsRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - JWT service for bearer token validation
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    movie_repo: Arc<dyn MovieRepository>,
    pulse_repo: Arc<dyn PulseRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    bookmark_repo: Arc<dyn BookmarkRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    stats_repo: Arc<dyn StatsRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    message_repo: Arc<dyn DirectMessageRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Wire every PostgreSQL repository onto one pool
    pub fn postgres(
        pool: PgPool,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo: Arc::new(PgUserRepository::new(pool.clone())),
            movie_repo: Arc::new(PgMovieRepository::new(pool.clone())),
            pulse_repo: Arc::new(PgPulseRepository::new(pool.clone())),
            reaction_repo: Arc::new(PgReactionRepository::new(pool.clone())),
            comment_repo: Arc::new(PgCommentRepository::new(pool.clone())),
            follow_repo: Arc::new(PgFollowRepository::new(pool.clone())),
            bookmark_repo: Arc::new(PgBookmarkRepository::new(pool.clone())),
            notification_repo: Arc::new(PgNotificationRepository::new(pool.clone())),
            stats_repo: Arc::new(PgStatsRepository::new(pool.clone())),
            conversation_repo: Arc::new(PgConversationRepository::new(pool.clone())),
            message_repo: Arc::new(PgDirectMessageRepository::new(pool.clone())),
            pool,
            jwt_service,
            snowflake_generator,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn movie_repo(&self) -> &dyn MovieRepository {
        self.movie_repo.as_ref()
    }

    pub fn pulse_repo(&self) -> &dyn PulseRepository {
        self.pulse_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    pub fn bookmark_repo(&self) -> &dyn BookmarkRepository {
        self.bookmark_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn stats_repo(&self) -> &dyn StatsRepository {
        self.stats_repo.as_ref()
    }

    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the direct message repository
    pub fn message_repo(&self) -> &dyn DirectMessageRepository {
        self.message_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom repositories
///
/// Anything not set explicitly falls back to the PostgreSQL implementation
/// on the given pool.
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    movie_repo: Option<Arc<dyn MovieRepository>>,
    pulse_repo: Option<Arc<dyn PulseRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    bookmark_repo: Option<Arc<dyn BookmarkRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    stats_repo: Option<Arc<dyn StatsRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    message_repo: Option<Arc<dyn DirectMessageRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn movie_repo(mut self, repo: Arc<dyn MovieRepository>) -> Self {
        self.movie_repo = Some(repo);
        self
    }

    pub fn pulse_repo(mut self, repo: Arc<dyn PulseRepository>) -> Self {
        self.pulse_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    pub fn bookmark_repo(mut self, repo: Arc<dyn BookmarkRepository>) -> Self {
        self.bookmark_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn stats_repo(mut self, repo: Arc<dyn StatsRepository>) -> Self {
        self.stats_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn DirectMessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the pool, JWT service or ID generator is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let pool = self
            .pool
            .ok_or_else(|| ServiceError::validation("pool is required"))?;
        let jwt_service = self
            .jwt_service
            .ok_or_else(|| ServiceError::validation("jwt_service is required"))?;
        let snowflake_generator = self
            .snowflake_generator
            .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?;

        let mut ctx = ServiceContext::postgres(pool, jwt_service, snowflake_generator);
        if let Some(repo) = self.user_repo {
            ctx.user_repo = repo;
        }
        if let Some(repo) = self.movie_repo {
            ctx.movie_repo = repo;
        }
        if let Some(repo) = self.pulse_repo {
            ctx.pulse_repo = repo;
        }
        if let Some(repo) = self.reaction_repo {
            ctx.reaction_repo = repo;
        }
        if let Some(repo) = self.comment_repo {
            ctx.comment_repo = repo;
        }
        if let Some(repo) = self.follow_repo {
            ctx.follow_repo = repo;
        }
        if let Some(repo) = self.bookmark_repo {
            ctx.bookmark_repo = repo;
        }
        if let Some(repo) = self.notification_repo {
            ctx.notification_repo = repo;
        }
        if let Some(repo) = self.stats_repo {
            ctx.stats_repo = repo;
        }
        if let Some(repo) = self.conversation_repo {
            ctx.conversation_repo = repo;
        }
        if let Some(repo) = self.message_repo {
            ctx.message_repo = repo;
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_pool() {
        let err = ServiceContextBuilder::new()
            .jwt_service(Arc::new(JwtService::new("secret", 900)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("pool is required"));
    }

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServiceContext>();
    }
}
