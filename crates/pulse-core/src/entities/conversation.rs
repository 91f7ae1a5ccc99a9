//! Direct messaging: conversations, participants and messages

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::user::User;

pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Conversation between two or more users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// A user's membership in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub conversation_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
    /// `None` until the participant first marks the conversation read
    pub last_read_at: Option<DateTime<Utc>>,
}

/// Direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DirectMessage {
    pub fn new(
        id: Snowflake,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        content: String,
        media_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation_id,
            sender_id,
            content,
            media_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `viewer` has read this message given their read marker
    pub fn is_read_by(&self, viewer: Snowflake, last_read_at: Option<DateTime<Utc>>) -> bool {
        self.sender_id == viewer || last_read_at.is_some_and(|at| self.created_at <= at)
    }
}

/// Conversation listing entry for one user
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub participants: Vec<User>,
    pub last_message: Option<DirectMessage>,
    pub unread_count: i64,
}

/// Add the creator, drop duplicates, and require at least two members
pub fn normalize_participants(
    creator: Snowflake,
    requested: &[Snowflake],
) -> Result<Vec<Snowflake>, DomainError> {
    let mut ids = Vec::with_capacity(requested.len() + 1);
    ids.push(creator);
    ids.extend_from_slice(requested);
    ids.sort_unstable();
    ids.dedup();

    if ids.len() < 2 {
        return Err(DomainError::NotEnoughParticipants);
    }
    Ok(ids)
}

/// Trim message text; empty text is allowed only alongside media
pub fn normalize_message(content: &str, has_media: bool) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() && !has_media {
        return Err(DomainError::EmptyContent);
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}
