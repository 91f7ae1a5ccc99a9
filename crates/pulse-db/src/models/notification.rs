//! Notification and daily stats database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Notification joined with actor and pulse/comment previews
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntryModel {
    pub id: i64,
    pub user_id: i64,
    pub actor_id: i64,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub pulse_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub content: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub actor_username: String,
    pub actor_display_name: Option<String>,
    pub actor_avatar_url: Option<String>,
    pub actor_created_at: DateTime<Utc>,
    pub pulse_preview: Option<String>,
    pub comment_preview: Option<String>,
}

/// Database model for user_daily_stats table
#[derive(Debug, Clone, FromRow)]
pub struct DailyStatModel {
    pub user_id: i64,
    pub stat_date: NaiveDate,
    pub pulses_posted: i64,
    pub likes_received: i64,
    pub new_followers: i64,
    pub comments_received: i64,
}
