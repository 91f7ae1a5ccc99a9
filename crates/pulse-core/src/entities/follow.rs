//! Follow edges and bookmarks

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Directed follow edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: Snowflake,
    pub following_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Build an edge, rejecting self-follows
    pub fn new(follower_id: Snowflake, following_id: Snowflake) -> Result<Self, DomainError> {
        if follower_id == following_id {
            return Err(DomainError::CannotFollowSelf);
        }
        Ok(Self {
            follower_id,
            following_id,
            created_at: Utc::now(),
        })
    }
}

/// Saved pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    pub user_id: Snowflake,
    pub pulse_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_follow_rejected() {
        let me = Snowflake::new(4);
        assert!(matches!(Follow::new(me, me), Err(DomainError::CannotFollowSelf)));
        assert!(Follow::new(me, Snowflake::new(5)).is_ok());
    }
}
