//! User entity - profile data owned by the external auth collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Who may see a user's pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Followers,
    Private,
}

impl ProfileVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Followers => "followers",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for ProfileVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileVisibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "followers" => Ok(Self::Followers),
            "private" => Ok(Self::Private),
            other => Err(DomainError::ValidationError(format!(
                "Invalid profile visibility: {other}"
            ))),
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Absent settings row means public
    pub visibility: ProfileVisibility,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            username,
            display_name: None,
            avatar_url: None,
            visibility: ProfileVisibility::Public,
            created_at: Utc::now(),
        }
    }

    /// Display name, falling back to the username
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Whether `viewer` may see this user's pulses
    pub fn is_visible_to(&self, viewer: Option<Snowflake>) -> bool {
        self.visibility != ProfileVisibility::Private || viewer == Some(self.id)
    }
}

/// Extract `@username` mentions from free text, in order of first appearance
///
/// Handles are ASCII letters, digits, `_`, `.` and `-`; trailing dots are
/// trimmed so "thanks @ana." mentions `ana`. Duplicates are dropped.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((idx, ch)) = chars.next() {
        let at_word_start = prev.map_or(true, |p| !p.is_alphanumeric() && p != '_');
        prev = Some(ch);
        if ch != '@' || !at_word_start {
            continue;
        }

        let start = idx + 1;
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                end = i + c.len_utf8();
                prev = Some(c);
                chars.next();
            } else {
                break;
            }
        }

        let handle = text[start..end].trim_end_matches('.');
        if !handle.is_empty() && !mentions.iter().any(|m| m.eq_ignore_ascii_case(handle)) {
            mentions.push(handle.to_string());
        }
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let mut user = User::new(Snowflake::new(1), "ana".to_string());
        assert_eq!(user.display_name(), "ana");

        user.display_name = Some("Ana Lima".to_string());
        assert_eq!(user.display_name(), "Ana Lima");
    }

    #[test]
    fn test_private_profile_visible_only_to_owner() {
        let mut user = User::new(Snowflake::new(7), "ana".to_string());
        assert!(user.is_visible_to(None));

        user.visibility = ProfileVisibility::Private;
        assert!(!user.is_visible_to(None));
        assert!(!user.is_visible_to(Some(Snowflake::new(8))));
        assert!(user.is_visible_to(Some(Snowflake::new(7))));
    }

    #[test]
    fn test_extract_mentions() {
        let mentions = extract_mentions("@ana loved it, thanks @bo_b. cc @ana and mail@example.com");
        assert_eq!(mentions, vec!["ana".to_string(), "bo_b".to_string()]);
    }

    #[test]
    fn test_extract_mentions_ignores_bare_at() {
        assert!(extract_mentions("meet @ 5").is_empty());
    }
}
