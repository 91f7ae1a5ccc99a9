//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    Comment, Conversation, DailyStat, DirectMessage, FeedPulse, Movie, NotificationEntry,
    Notification, Participant, ProfileVisibility, Pulse, ReactionToggle, ReactionType,
    StatCounter, User,
};
use crate::error::DomainError;
use crate::value_objects::{FeedFilter, PageRequest, Snowflake, TimeWindow};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Everything that shapes one page of the feed
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub filter: FeedFilter,
    pub window: TimeWindow,
    pub page: PageRequest,
    /// Authenticated viewer, if any
    pub viewer_id: Option<Snowflake>,
    /// Lowercased tag without leading `#`
    pub hashtag: Option<String>,
    /// External catalogue ID of a linked movie
    pub movie_external_id: Option<String>,
    pub linked_type: Option<String>,
    pub author_id: Option<Snowflake>,
}

impl FeedQuery {
    /// Lower creation-time bound, only for windowed filters
    pub fn created_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.filter.uses_window().then(|| self.window.since(now))
    }

    /// A following feed without a viewer is always empty
    pub fn is_trivially_empty(&self) -> bool {
        self.filter == FeedFilter::Following && self.viewer_id.is_none()
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Batch lookup, order not guaranteed
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Find user by username (case-insensitive)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Batch lookup by username (case-insensitive)
    async fn find_by_usernames(&self, usernames: &[String]) -> RepoResult<Vec<User>>;

    /// Insert a user row. Accounts are normally created by the auth service.
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Upsert the user's profile visibility setting
    async fn set_visibility(&self, id: Snowflake, visibility: ProfileVisibility)
        -> RepoResult<()>;
}

// ============================================================================
// Movie Repository
// ============================================================================

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Movie>>;

    /// Insert a catalogue entry and return it with its internal ID
    async fn create(
        &self,
        external_id: &str,
        title: &str,
        poster_url: Option<&str>,
    ) -> RepoResult<Movie>;
}

// ============================================================================
// Pulse Repository
// ============================================================================

#[async_trait]
pub trait PulseRepository: Send + Sync {
    /// Non-deleted pulse, ignoring profile visibility
    async fn find_active(&self, id: Snowflake) -> RepoResult<Option<Pulse>>;

    /// Non-deleted pulse the viewer may see, with its author
    async fn find_visible(
        &self,
        id: Snowflake,
        viewer_id: Option<Snowflake>,
    ) -> RepoResult<Option<FeedPulse>>;

    async fn create(&self, pulse: &Pulse) -> RepoResult<()>;

    /// Set `deleted_at`; returns false if already gone
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// One feed page
    async fn list_feed(&self, query: &FeedQuery) -> RepoResult<Vec<FeedPulse>>;

    /// Hashtag occurrence counts over visible pulses since `since`, most used first
    async fn trending_tags(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<(String, i64)>>;

    /// Atomically bump the share counter and return the new value
    async fn increment_shares(&self, id: Snowflake) -> RepoResult<i64>;

    /// Non-deleted pulses by this author
    async fn count_by_author(&self, author_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Add, remove or switch the user's reaction and update the pulse counters
    /// in one transaction
    async fn toggle(
        &self,
        pulse_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionType,
    ) -> RepoResult<ReactionToggle>;

    /// The user's reaction on each of the given pulses, in one query
    async fn find_for_user(
        &self,
        user_id: Snowflake,
        pulse_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, ReactionType>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert and bump `comments_count` in one transaction
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Newest first
    async fn list_by_pulse(&self, pulse_id: Snowflake, page: PageRequest)
        -> RepoResult<Vec<Comment>>;

    async fn count_by_pulse(&self, pulse_id: Snowflake) -> RepoResult<i64>;

    /// Delete and decrement `comments_count` (floored at zero) in one transaction
    async fn delete(&self, comment: &Comment) -> RepoResult<()>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Returns true only when a new edge was created
    async fn follow(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool>;

    /// Returns true only when an edge was removed
    async fn unfollow(&self, follower_id: Snowflake, following_id: Snowflake)
        -> RepoResult<bool>;

    async fn is_following(&self, follower_id: Snowflake, following_id: Snowflake)
        -> RepoResult<bool>;

    async fn follower_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    async fn following_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Public accounts worth following, most-followed first
    ///
    /// With a viewer, the viewer and everyone they already follow are left out.
    async fn suggestions(&self, viewer_id: Option<Snowflake>, limit: i64)
        -> RepoResult<Vec<User>>;
}

// ============================================================================
// Bookmark Repository
// ============================================================================

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    async fn add(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool>;

    async fn remove(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool>;

    async fn exists(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Newest first, joined with actor and pulse/comment previews
    async fn list(
        &self,
        user_id: Snowflake,
        unread_only: bool,
        page: PageRequest,
    ) -> RepoResult<Vec<NotificationEntry>>;

    async fn count(&self, user_id: Snowflake, unread_only: bool) -> RepoResult<i64>;

    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Returns false when the notification is missing or not the user's
    async fn mark_read(&self, user_id: Snowflake, id: Snowflake) -> RepoResult<bool>;

    /// Number of notifications flipped to read
    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64>;

    /// Returns false when the notification is missing or not the user's
    async fn delete(&self, user_id: Snowflake, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Stats Repository
// ============================================================================

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Upsert the day row and add one to `counter`
    async fn increment(
        &self,
        user_id: Snowflake,
        date: NaiveDate,
        counter: StatCounter,
    ) -> RepoResult<()>;

    async fn find_day(&self, user_id: Snowflake, date: NaiveDate)
        -> RepoResult<Option<DailyStat>>;

    /// Rows in the inclusive range, ascending by date
    async fn find_range(
        &self,
        user_id: Snowflake,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<DailyStat>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Conversation whose participant set equals `user_ids` exactly
    async fn find_by_exact_participants(
        &self,
        user_ids: &[Snowflake],
    ) -> RepoResult<Option<Conversation>>;

    /// Insert the conversation and its participants in one transaction
    async fn create(&self, conversation: &Conversation, user_ids: &[Snowflake])
        -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    async fn find_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>>;

    async fn list_participants(&self, conversation_id: Snowflake)
        -> RepoResult<Vec<Participant>>;

    /// User's conversations, most recently active first
    async fn list_for_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<Conversation>>;

    async fn count_for_user(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Set the participant's `last_read_at` to now
    async fn mark_read(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Remove the user's participant row, deleting the conversation once empty.
    /// Returns true when the conversation itself was deleted.
    async fn remove_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Direct Message Repository
// ============================================================================

#[async_trait]
pub trait DirectMessageRepository: Send + Sync {
    /// Insert and touch the conversation's `last_message_at` in one transaction
    async fn create(&self, message: &DirectMessage) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DirectMessage>>;

    /// Page counted from the most recent end, returned oldest first
    async fn find_page(
        &self,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<DirectMessage>>;

    async fn count_in(&self, conversation_id: Snowflake) -> RepoResult<i64>;

    async fn latest_in(&self, conversation_id: Snowflake) -> RepoResult<Option<DirectMessage>>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Messages from others newer than the user's read marker in one conversation
    async fn unread_count_in(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<i64>;

    /// Same as [`Self::unread_count_in`], summed over all the user's conversations
    async fn unread_count_for_user(&self, user_id: Snowflake) -> RepoResult<i64>;
}
