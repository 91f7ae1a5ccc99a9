//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in pulse-core.
//! Counter columns on `pulses` are maintained in the same transaction as the
//! rows they count.

mod comment;
mod conversation;
mod direct_message;
mod error;
mod follow;
mod notification;
mod pulse;
mod reaction;
mod stats;
mod user;

pub use comment::PgCommentRepository;
pub use conversation::PgConversationRepository;
pub use direct_message::PgDirectMessageRepository;
pub use follow::{PgBookmarkRepository, PgFollowRepository};
pub use notification::PgNotificationRepository;
pub use pulse::PgPulseRepository;
pub use reaction::PgReactionRepository;
pub use stats::PgStatsRepository;
pub use user::{PgMovieRepository, PgUserRepository};
