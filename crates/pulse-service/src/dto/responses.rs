//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output with camelCase
//! field names. Snowflake IDs are serialized as strings for JavaScript
//! compatibility.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use pulse_core::StatTotals;
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Page of results with page-number pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                has_more: page * limit < total,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    /// Whether more results exist
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

// ============================================================================
// Pulse Responses
// ============================================================================

/// Author block embedded in a pulse
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseAuthorResponse {
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    /// Role the pulse was posted under
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedContentResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseContentResponse {
    pub text: String,
    /// Null rather than empty when there is no media
    pub media: Option<Vec<String>>,
    pub linked_content: Option<LinkedContentResponse>,
    pub hashtags: Vec<String>,
    pub star_rating: Option<i16>,
}

/// Per-type reaction counts (all six types present) plus `total`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    #[serde(flatten)]
    pub counts: BTreeMap<&'static str, i64>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementResponse {
    pub reactions: ReactionSummary,
    pub user_reaction: Option<String>,
    pub comments: i64,
    pub shares: i64,
    pub has_commented: bool,
    pub has_shared: bool,
    pub has_bookmarked: bool,
}

/// Pulse as returned by the feed and single-pulse reads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseResponse {
    pub id: String,
    pub user_id: String,
    pub user_info: PulseAuthorResponse,
    pub content: PulseContentResponse,
    pub engagement: EngagementResponse,
    pub timestamp: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

/// Result of a reaction toggle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggleResponse {
    pub reactions: ReactionSummary,
    pub user_reaction: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingTopicResponse {
    /// 1-based rank
    pub id: usize,
    pub tag: String,
    pub count: i64,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthorResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author: CommentAuthorResponse,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookmarkResponse {
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShareResponse {
    pub shares: i64,
}

// ============================================================================
// Notification Responses
// ============================================================================

/// Compact user reference used by notifications and messages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPulseResponse {
    pub id: String,
    pub content_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationCommentResponse {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: UserSummaryResponse,
    pub content: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<NotificationPulseResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<NotificationCommentResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarkedResponse {
    pub marked: u64,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub profile_visibility: String,
    pub followers: i64,
    pub following: i64,
    pub pulses: i64,
    /// Whether the viewer follows this user; absent for anonymous viewers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStatsResponse {
    pub followers: i64,
    pub following: i64,
    pub pulses: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FollowResponse {
    pub following: bool,
}

// ============================================================================
// Daily Stats Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatResponse {
    pub date: NaiveDate,
    pub pulses_posted: i64,
    pub likes_received: i64,
    pub new_followers: i64,
    pub comments_received: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRangeResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: StatTotals,
    pub daily: Vec<DailyStatResponse>,
}

// ============================================================================
// Messaging Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageResponse {
    /// First 100 characters
    pub content: String,
    pub sender_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub participants: Vec<UserSummaryResponse>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message: Option<LastMessageResponse>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender: UserSummaryResponse,
    pub content: String,
    pub media_url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_has_more() {
        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![1, 2], 1, 2, 5);
        assert!(page.pagination.has_more);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![5], 3, 2, 5);
        assert!(!page.pagination.has_more);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["hasMore"], false);
    }

    #[test]
    fn test_reaction_summary_flattens_counts() {
        let mut counts = BTreeMap::new();
        counts.insert("love", 2);
        counts.insert("fire", 0);
        let summary = ReactionSummary { counts, total: 2 };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["love"], 2);
        assert_eq!(json["fire"], 0);
        assert_eq!(json["total"], 2);
    }

    #[test]
    fn test_notification_omits_missing_refs() {
        let response = NotificationResponse {
            id: "1".into(),
            kind: "follow".into(),
            actor: UserSummaryResponse {
                user_id: "2".into(),
                username: "ana".into(),
                display_name: "Ana".into(),
                avatar_url: None,
            },
            content: None,
            is_read: false,
            created_at: Utc::now(),
            pulse: None,
            comment: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "follow");
        assert_eq!(json["isRead"], false);
        assert!(json.get("pulse").is_none());
    }

    #[test]
    fn test_readiness() {
        assert_eq!(ReadinessResponse::ready(true).status, "ready");
        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.database, "unhealthy");
    }
}
