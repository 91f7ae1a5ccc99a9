//! Domain errors - business-rule taxonomy for the pulse domain

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Pulse not found: {0}")]
    PulseNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Invalid reaction type: {0}")]
    InvalidReactionType(String),

    #[error("Invalid role: {0}. Must be 'critic', 'industry_pro', or 'talent_pro'")]
    InvalidRole(String),

    #[error("Star rating requires a professional role (critic, industry_pro, or talent_pro)")]
    StarRatingRequiresRole,

    #[error("Star rating must be between 1 and 5")]
    StarRatingOutOfRange,

    #[error("Star rating requires a linked movie")]
    StarRatingRequiresMovie,

    #[error("Cannot follow yourself")]
    CannotFollowSelf,

    #[error("A conversation needs at least 2 participants")]
    NotEnoughParticipants,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the author of this pulse")]
    NotPulseAuthor,

    #[error("Not the author of this comment")]
    NotCommentAuthor,

    #[error("Not the sender of this message")]
    NotMessageSender,

    #[error("Not a participant in this conversation")]
    NotParticipant,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PulseNotFound(_) => "UNKNOWN_PULSE",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::MovieNotFound(_) => "UNKNOWN_MOVIE",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::InvalidReactionType(_) => "INVALID_REACTION_TYPE",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::StarRatingRequiresRole
            | Self::StarRatingOutOfRange
            | Self::StarRatingRequiresMovie => "INVALID_STAR_RATING",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::NotEnoughParticipants => "NOT_ENOUGH_PARTICIPANTS",

            // Authorization
            Self::NotPulseAuthor => "NOT_PULSE_AUTHOR",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::NotParticipant => "NOT_PARTICIPANT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PulseNotFound(_)
                | Self::CommentNotFound(_)
                | Self::MovieNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ContentTooLong { .. }
                | Self::EmptyContent
                | Self::InvalidReactionType(_)
                | Self::InvalidRole(_)
                | Self::StarRatingRequiresRole
                | Self::StarRatingOutOfRange
                | Self::StarRatingRequiresMovie
                | Self::CannotFollowSelf
                | Self::NotEnoughParticipants
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotPulseAuthor
                | Self::NotCommentAuthor
                | Self::NotMessageSender
                | Self::NotParticipant
        )
    }

    /// Check if this is a conflict error
    ///
    /// Every social mutation is idempotent, so nothing currently conflicts.
    pub fn is_conflict(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::PulseNotFound(Snowflake::new(1)).code(), "UNKNOWN_PULSE");
        assert_eq!(DomainError::StarRatingRequiresMovie.code(), "INVALID_STAR_RATING");
        assert_eq!(DomainError::NotParticipant.code(), "NOT_PARTICIPANT");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::CommentNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::CannotFollowSelf.is_validation());
        assert!(DomainError::NotPulseAuthor.is_authorization());
        assert!(!DomainError::DatabaseError("boom".into()).is_validation());
        assert!(!DomainError::NotMessageSender.is_not_found());
    }

    #[test]
    fn test_star_rating_messages() {
        assert_eq!(
            DomainError::StarRatingRequiresMovie.to_string(),
            "Star rating requires a linked movie"
        );
        assert_eq!(
            DomainError::StarRatingOutOfRange.to_string(),
            "Star rating must be between 1 and 5"
        );
    }
}
