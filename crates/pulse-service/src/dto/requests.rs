//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`; query strings only
//! `Deserialize`, with pagination clamped later instead of rejected.

use chrono::NaiveDate;
use pulse_core::{FeedFilter, PageRequest, TimeWindow};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Query Parameters
// ============================================================================

/// Raw `page`/`limit` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageParams {
    /// Clamp into a page request with the listing's default limit
    pub fn to_page(self, default_limit: i64) -> PageRequest {
        PageRequest::with_default_limit(self.page, self.limit, default_limit)
    }
}

/// Feed query: `GET /pulse`, `GET /pulse/feed`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    #[serde(default)]
    pub filter: Option<FeedFilter>,
    #[serde(default)]
    pub window: Option<TimeWindow>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub hashtag: Option<String>,
    /// External catalogue ID of a linked movie
    #[serde(default)]
    pub movie_id: Option<String>,
    #[serde(default)]
    pub linked_type: Option<String>,
    /// Author filter, by ID
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Trending topics query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    pub window: Option<TimeWindow>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Suggested users query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SuggestedUsersParams {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Notification listing query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationParams {
    #[serde(default)]
    pub unread_only: Option<bool>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Inclusive date range, `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatsRangeParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ============================================================================
// Pulse Requests
// ============================================================================

/// Generic linked entity supplied instead of a catalogue movie
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkedContentRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32, message = "Linked content type must be 1-32 characters"))]
    pub kind: String,

    #[validate(length(min = 1, max = 64, message = "Linked content id must be 1-64 characters"))]
    pub id: String,

    #[validate(length(min = 1, max = 500, message = "Linked content title must be 1-500 characters"))]
    pub title: String,

    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Create pulse request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePulseRequest {
    #[serde(default)]
    pub content_text: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 media items"))]
    pub content_media: Option<Vec<String>>,

    /// External catalogue ID of the movie to link
    #[serde(default)]
    pub linked_movie_id: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub linked_content: Option<LinkedContentRequest>,

    #[serde(default)]
    pub hashtags: Option<Vec<String>>,

    /// critic, industry_pro or talent_pro
    #[serde(default)]
    pub posted_as_role: Option<String>,

    #[serde(default)]
    pub star_rating: Option<i16>,
}

/// Toggle reaction request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactionRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Reaction type is required"))]
    pub kind: String,
}

/// Add comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: String,
}

// ============================================================================
// Messaging Requests
// ============================================================================

/// Create (or find) a conversation
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[validate(length(min = 1, max = 50, message = "Provide 1-50 participant IDs"))]
    pub participant_ids: Vec<String>,
}

/// Send a direct message
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    #[validate(length(max = 2048, message = "Media URL is too long"))]
    pub media_url: Option<String>,
}
