//! Domain entities - core business objects

mod comment;
mod conversation;
mod follow;
mod movie;
mod notification;
mod pulse;
mod reaction;
mod stats;
mod user;

pub use comment::{normalize_comment, Comment, MAX_COMMENT_LENGTH};
pub use conversation::{
    normalize_message, normalize_participants, Conversation, ConversationSummary, DirectMessage,
    Participant, MAX_MESSAGE_LENGTH,
};
pub use follow::{Bookmark, Follow};
pub use movie::{LinkedContent, Movie};
pub use notification::{
    preview, Notification, NotificationEntry, NotificationType, PREVIEW_CHARS,
};
pub use pulse::{
    infer_topic_category, normalize_hashtag_filter, popularity_score, FeedPulse, PostingRole,
    Pulse, PulseDraft, MAX_PULSE_TEXT,
};
pub use reaction::{resolve_toggle, ReactionCounts, ReactionToggle, ReactionType, ToggleOutcome};
pub use stats::{trailing_range, DailyStat, StatCounter, StatTotals};
pub use user::{extract_mentions, ProfileVisibility, User};
