//! Database models - SQLx-compatible structs for PostgreSQL tables

mod conversation;
mod notification;
mod pulse;
mod user;

pub use conversation::{ConversationModel, DirectMessageModel, ParticipantModel};
pub use notification::{DailyStatModel, NotificationEntryModel};
pub use pulse::{
    CommentModel, FeedPulseModel, PulseModel, ReactionCountsModel, TrendingTagModel,
    UserReactionModel,
};
pub use user::{MovieModel, UserModel};
