//! Comment entity

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const MAX_COMMENT_LENGTH: usize = 500;

/// Comment on a pulse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub pulse_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, pulse_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            pulse_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    #[inline]
    pub fn belongs_to(&self, pulse_id: Snowflake) -> bool {
        self.pulse_id == pulse_id
    }
}

/// Trim comment text and check it is 1-500 characters
pub fn normalize_comment(content: &str) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyContent);
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_COMMENT_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}
