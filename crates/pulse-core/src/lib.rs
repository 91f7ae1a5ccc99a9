//! # pulse-core
//!
//! Domain layer for the pulse social backend: entities, value objects,
//! domain errors and the repository traits the database layer implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    infer_topic_category, popularity_score, Bookmark, Comment, Conversation, ConversationSummary,
    DailyStat, DirectMessage, FeedPulse, Follow, LinkedContent, Movie, Notification,
    NotificationEntry, NotificationType, Participant, PostingRole, ProfileVisibility, Pulse,
    PulseDraft, ReactionCounts, ReactionToggle, ReactionType, StatCounter, StatTotals,
    ToggleOutcome, User,
};
pub use error::DomainError;
pub use traits::{
    BookmarkRepository, CommentRepository, ConversationRepository, DirectMessageRepository,
    FeedQuery, FollowRepository, MovieRepository, NotificationRepository, PulseRepository,
    ReactionRepository, RepoResult, StatsRepository, UserRepository,
};
pub use value_objects::{
    FeedFilter, PageRequest, Snowflake, SnowflakeGenerator, SnowflakeParseError, TimeWindow,
};
