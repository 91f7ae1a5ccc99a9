//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.
//! Where a DTO needs more than one entity, a small carrier struct bundles
//! them first.

use pulse_core::entities::preview;
use pulse_core::{
    Comment, ConversationSummary, DailyStat, DirectMessage, FeedPulse, LinkedContent,
    NotificationEntry, ReactionCounts, ReactionToggle, ReactionType, User,
};

use super::responses::{
    CommentAuthorResponse, CommentResponse, ConversationResponse, DailyStatResponse,
    EngagementResponse, LastMessageResponse, LinkedContentResponse, MessageResponse,
    NotificationCommentResponse, NotificationPulseResponse, NotificationResponse,
    PulseAuthorResponse, PulseContentResponse, PulseResponse, ReactionSummary,
    ReactionToggleResponse, UserSummaryResponse,
};

// ============================================================================
// Carrier structs
// ============================================================================

/// Feed pulse annotated with the viewer's own reaction
#[derive(Debug, Clone)]
pub struct PulseWithReaction {
    pub pulse: FeedPulse,
    pub user_reaction: Option<ReactionType>,
    pub has_bookmarked: bool,
}

/// Comment together with its author
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}

/// Message together with its sender and the viewer's read state
#[derive(Debug, Clone)]
pub struct MessageWithSender {
    pub message: DirectMessage,
    pub sender: User,
    pub is_read: bool,
}

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserSummaryResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name().to_string(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<&User> for CommentAuthorResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name().to_string(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

// ============================================================================
// Pulse Mappers
// ============================================================================

impl ReactionSummary {
    pub fn new(counts: &ReactionCounts, total: i64) -> Self {
        Self {
            counts: counts.to_map(),
            total,
        }
    }
}

impl From<&LinkedContent> for LinkedContentResponse {
    fn from(linked: &LinkedContent) -> Self {
        Self {
            kind: linked.kind.clone(),
            id: linked.id.clone(),
            title: linked.title.clone(),
            poster_url: linked.poster_url.clone(),
        }
    }
}

impl From<PulseWithReaction> for PulseResponse {
    fn from(value: PulseWithReaction) -> Self {
        let PulseWithReaction {
            pulse: FeedPulse { pulse, author },
            user_reaction,
            has_bookmarked,
        } = value;

        let user_info = PulseAuthorResponse {
            username: author.username.clone(),
            display_name: author.display_name().to_string(),
            avatar_url: author.avatar_url.clone(),
            is_verified: pulse.is_verified(),
            role: pulse.posted_as_role.map(|r| r.as_str().to_string()),
        };

        let engagement = EngagementResponse {
            reactions: ReactionSummary::new(&pulse.reactions, pulse.reactions_total),
            user_reaction: user_reaction.map(|r| r.as_str().to_string()),
            comments: pulse.comments_count,
            shares: pulse.shares_count,
            has_commented: false,
            has_shared: false,
            has_bookmarked,
        };

        Self {
            id: pulse.id.to_string(),
            user_id: pulse.author_id.to_string(),
            user_info,
            content: PulseContentResponse {
                linked_content: pulse.linked.as_ref().map(LinkedContentResponse::from),
                media: (!pulse.media.is_empty()).then_some(pulse.media),
                text: pulse.content_text,
                hashtags: pulse.hashtags,
                star_rating: pulse.star_rating,
            },
            engagement,
            timestamp: pulse.created_at,
            edited_at: pulse.edited_at,
        }
    }
}

impl From<&ReactionToggle> for ReactionToggleResponse {
    fn from(toggle: &ReactionToggle) -> Self {
        Self {
            reactions: ReactionSummary::new(&toggle.counts, toggle.total),
            user_reaction: toggle.user_reaction.map(|r| r.as_str().to_string()),
        }
    }
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(value: CommentWithAuthor) -> Self {
        Self {
            id: value.comment.id.to_string(),
            post_id: value.comment.pulse_id.to_string(),
            author: CommentAuthorResponse::from(&value.author),
            content: value.comment.content,
            created_at: value.comment.created_at,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<NotificationEntry> for NotificationResponse {
    fn from(entry: NotificationEntry) -> Self {
        let n = entry.notification;
        let pulse = n.pulse_id.map(|id| NotificationPulseResponse {
            id: id.to_string(),
            content_text: entry.pulse_preview.unwrap_or_default(),
        });
        let comment = n.comment_id.map(|id| NotificationCommentResponse {
            id: id.to_string(),
            content: entry.comment_preview.unwrap_or_default(),
        });

        Self {
            id: n.id.to_string(),
            kind: n.kind.as_str().to_string(),
            actor: UserSummaryResponse::from(&entry.actor),
            content: n.content,
            is_read: n.is_read,
            created_at: n.created_at,
            pulse,
            comment,
        }
    }
}

// ============================================================================
// Stats Mappers
// ============================================================================

impl From<&DailyStat> for DailyStatResponse {
    fn from(stat: &DailyStat) -> Self {
        Self {
            date: stat.stat_date,
            pulses_posted: stat.pulses_posted,
            likes_received: stat.likes_received,
            new_followers: stat.new_followers,
            comments_received: stat.comments_received,
        }
    }
}

// ============================================================================
// Messaging Mappers
// ============================================================================

impl From<&DirectMessage> for LastMessageResponse {
    fn from(message: &DirectMessage) -> Self {
        Self {
            content: preview(&message.content),
            sender_id: message.sender_id.to_string(),
            timestamp: message.created_at,
        }
    }
}

impl From<ConversationSummary> for ConversationResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            id: summary.conversation.id.to_string(),
            participants: summary
                .participants
                .iter()
                .map(UserSummaryResponse::from)
                .collect(),
            last_message_at: summary.conversation.last_message_at,
            last_message: summary.last_message.as_ref().map(LastMessageResponse::from),
            unread_count: summary.unread_count,
            created_at: summary.conversation.created_at,
        }
    }
}

impl From<MessageWithSender> for MessageResponse {
    fn from(value: MessageWithSender) -> Self {
        Self {
            id: value.message.id.to_string(),
            conversation_id: value.message.conversation_id.to_string(),
            sender: UserSummaryResponse::from(&value.sender),
            content: value.message.content,
            media_url: value.message.media_url,
            is_read: value.is_read,
            created_at: value.message.created_at,
            updated_at: value.message.updated_at,
        }
    }
}
