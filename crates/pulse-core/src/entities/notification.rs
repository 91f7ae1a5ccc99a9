//! Notification entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::user::User;

/// Preview length for notification content and referenced text
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Follow,
    Reaction,
    Comment,
    Mention,
    Share,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Reaction => "reaction",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "reaction" => Ok(Self::Reaction),
            "comment" => Ok(Self::Comment),
            "mention" => Ok(Self::Mention),
            "share" => Ok(Self::Share),
            other => Err(DomainError::ValidationError(format!(
                "Invalid notification type: {other}"
            ))),
        }
    }
}

/// Activity notification addressed to `user_id`, caused by `actor_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub actor_id: Snowflake,
    pub kind: NotificationType,
    pub pulse_id: Option<Snowflake>,
    pub comment_id: Option<Snowflake>,
    pub content: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Returns `None` for self-notifications
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
        kind: NotificationType,
    ) -> Option<Self> {
        (user_id != actor_id).then(|| Self {
            id,
            user_id,
            actor_id,
            kind,
            pulse_id: None,
            comment_id: None,
            content: None,
            is_read: false,
            created_at: Utc::now(),
        })
    }

    pub fn with_pulse(mut self, pulse_id: Snowflake) -> Self {
        self.pulse_id = Some(pulse_id);
        self
    }

    pub fn with_comment(mut self, comment_id: Snowflake) -> Self {
        self.comment_id = Some(comment_id);
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(preview(content));
        self
    }
}

/// Notification joined with its actor and previews of what it points at
#[derive(Debug, Clone)]
pub struct NotificationEntry {
    pub notification: Notification,
    pub actor: User,
    pub pulse_preview: Option<String>,
    pub comment_preview: Option<String>,
}

/// First [`PREVIEW_CHARS`] characters of `text`
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_notification_suppressed() {
        let me = Snowflake::new(1);
        assert!(Notification::new(Snowflake::new(10), me, me, NotificationType::Follow).is_none());
    }

    #[test]
    fn test_builder_truncates_content() {
        let n = Notification::new(
            Snowflake::new(10),
            Snowflake::new(1),
            Snowflake::new(2),
            NotificationType::Comment,
        )
        .unwrap()
        .with_pulse(Snowflake::new(3))
        .with_content(&"ü".repeat(150));

        assert_eq!(n.pulse_id, Some(Snowflake::new(3)));
        assert_eq!(n.content.unwrap().chars().count(), PREVIEW_CHARS);
        assert!(!n.is_read);
    }

    #[test]
    fn test_type_round_trips_through_str() {
        assert_eq!("mention".parse::<NotificationType>().unwrap(), NotificationType::Mention);
        assert!("poke".parse::<NotificationType>().is_err());
    }
}
