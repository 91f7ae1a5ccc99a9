//! Pulse database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for pulses, with the linked movie columns joined in
#[derive(Debug, Clone, FromRow)]
pub struct PulseModel {
    pub id: i64,
    pub user_id: i64,
    pub content_text: String,
    pub content_media: Vec<String>,
    pub linked_movie_id: Option<i64>,
    pub linked_type: Option<String>,
    pub linked_id: Option<String>,
    pub linked_title: Option<String>,
    pub linked_poster_url: Option<String>,
    pub hashtags: Vec<String>,
    pub reactions_love: i64,
    pub reactions_fire: i64,
    pub reactions_mindblown: i64,
    pub reactions_laugh: i64,
    pub reactions_sad: i64,
    pub reactions_angry: i64,
    pub reactions_total: i64,
    pub comments_count: i64,
    pub shares_count: i64,
    pub posted_as_role: Option<String>,
    pub star_rating: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub movie_external_id: Option<String>,
    pub movie_title: Option<String>,
    pub movie_poster_url: Option<String>,
}

/// Feed row: pulse plus author columns
#[derive(Debug, Clone, FromRow)]
pub struct FeedPulseModel {
    #[sqlx(flatten)]
    pub pulse: PulseModel,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub author_visibility: Option<String>,
    pub author_created_at: DateTime<Utc>,
}

/// Per-type counters read back after a reaction toggle
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReactionCountsModel {
    pub reactions_love: i64,
    pub reactions_fire: i64,
    pub reactions_mindblown: i64,
    pub reactions_laugh: i64,
    pub reactions_sad: i64,
    pub reactions_angry: i64,
    pub reactions_total: i64,
}

/// The viewer's reaction on one pulse
#[derive(Debug, Clone, FromRow)]
pub struct UserReactionModel {
    pub pulse_id: i64,
    pub reaction_type: String,
}

/// Aggregated hashtag usage (from query)
#[derive(Debug, Clone, FromRow)]
pub struct TrendingTagModel {
    pub tag: String,
    pub count: i64,
}

/// Database model for pulse_comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub pulse_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
