//! Repository traits (ports)

mod repositories;

pub use repositories::{
    BookmarkRepository, CommentRepository, ConversationRepository, DirectMessageRepository,
    FeedQuery, FollowRepository, MovieRepository, NotificationRepository, PulseRepository,
    ReactionRepository, RepoResult, StatsRepository, UserRepository,
};
