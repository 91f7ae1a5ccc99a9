//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreateConversationRequest, CreatePulseRequest, FeedParams,
    LinkedContentRequest, NotificationParams, PageParams, ReactionRequest, SendMessageRequest,
    StatsRangeParams, SuggestedUsersParams, TrendingParams,
};

pub use responses::{
    BookmarkResponse, CommentAuthorResponse, CommentResponse, ConversationResponse,
    DailyStatResponse, EngagementResponse, FollowResponse, HealthChecks, HealthResponse,
    LastMessageResponse, LinkedContentResponse, MarkedResponse, MessageResponse,
    NotificationCommentResponse, NotificationListResponse, NotificationPulseResponse,
    NotificationResponse, PaginatedResponse, PaginationMeta, PulseAuthorResponse,
    PulseContentResponse, PulseResponse, ReactionSummary, ReactionToggleResponse,
    ReadinessResponse, ShareResponse, StatsRangeResponse, TrendingTopicResponse,
    UnreadCountResponse, UserProfileResponse, UserStatsResponse, UserSummaryResponse,
};

pub use mappers::{CommentWithAuthor, MessageWithSender, PulseWithReaction};
