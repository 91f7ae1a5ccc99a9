//! Pulse entity - a short post, optionally linked to a movie

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::movie::{LinkedContent, Movie};
use super::reaction::ReactionCounts;
use super::user::User;

/// Maximum pulse text length, in characters
pub const MAX_PULSE_TEXT: usize = 280;

/// Professional capability that allows rated posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingRole {
    Critic,
    IndustryPro,
    TalentPro,
}

impl PostingRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critic => "critic",
            Self::IndustryPro => "industry_pro",
            Self::TalentPro => "talent_pro",
        }
    }
}

impl fmt::Display for PostingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostingRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critic" => Ok(Self::Critic),
            "industry_pro" => Ok(Self::IndustryPro),
            "talent_pro" => Ok(Self::TalentPro),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Pulse entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content_text: String,
    pub media: Vec<String>,
    /// Internal movie row, set only for catalogue links
    pub linked_movie_id: Option<i64>,
    pub linked: Option<LinkedContent>,
    pub hashtags: Vec<String>,
    pub reactions: ReactionCounts,
    pub reactions_total: i64,
    pub comments_count: i64,
    pub shares_count: i64,
    pub posted_as_role: Option<PostingRole>,
    pub star_rating: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Pulse {
    /// Build a fresh pulse from a draft that already passed [`PulseDraft::validate`]
    pub fn from_draft(
        id: Snowflake,
        draft: PulseDraft,
        role: Option<PostingRole>,
        movie: Option<&Movie>,
    ) -> Self {
        let linked = movie.map(LinkedContent::from).or(draft.linked_content);
        Self {
            id,
            author_id: draft.author_id,
            content_text: draft.content_text,
            media: draft.media,
            linked_movie_id: movie.map(|m| m.id),
            linked,
            hashtags: normalize_hashtags(draft.hashtags),
            reactions: ReactionCounts::default(),
            reactions_total: 0,
            comments_count: 0,
            shares_count: 0,
            posted_as_role: role,
            star_rating: draft.star_rating,
            created_at: Utc::now(),
            edited_at: None,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Verified badge: the pulse was posted under a professional role
    #[inline]
    pub fn is_verified(&self) -> bool {
        self.posted_as_role.is_some()
    }

    pub fn popularity(&self) -> i64 {
        popularity_score(self.reactions_total, self.comments_count, self.shares_count)
    }

    /// Text cut to at most `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        self.content_text.chars().take(max_chars).collect()
    }
}

/// A pulse together with its author, as returned by feed reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPulse {
    pub pulse: Pulse,
    pub author: User,
}

/// Unvalidated input for a new pulse
#[derive(Debug, Clone, Default)]
pub struct PulseDraft {
    pub author_id: Snowflake,
    pub content_text: String,
    pub media: Vec<String>,
    /// External catalogue ID of the movie to link
    pub linked_movie_id: Option<String>,
    pub linked_content: Option<LinkedContent>,
    pub hashtags: Vec<String>,
    pub posted_as_role: Option<String>,
    pub star_rating: Option<i16>,
}

impl PulseDraft {
    /// Check text length, role and star-rating rules
    ///
    /// Returns the parsed posting role on success.
    pub fn validate(&self) -> Result<Option<PostingRole>, DomainError> {
        if self.content_text.chars().count() > MAX_PULSE_TEXT {
            return Err(DomainError::ContentTooLong {
                max: MAX_PULSE_TEXT,
            });
        }
        if self.content_text.trim().is_empty() && self.media.is_empty() {
            return Err(DomainError::EmptyContent);
        }

        let role = self
            .posted_as_role
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(str::parse::<PostingRole>)
            .transpose()?;

        if let Some(rating) = self.star_rating {
            if role.is_none() {
                return Err(DomainError::StarRatingRequiresRole);
            }
            if !(1..=5).contains(&rating) {
                return Err(DomainError::StarRatingOutOfRange);
            }
            if self.linked_movie_id.as_deref().map_or(true, str::is_empty) {
                return Err(DomainError::StarRatingRequiresMovie);
            }
        }

        Ok(role)
    }
}

/// Feed ranking score: an unweighted sum of the three engagement counters
///
/// The SQL side of the feed uses the same expression; keep both in step.
#[inline]
pub fn popularity_score(reactions_total: i64, comments: i64, shares: i64) -> i64 {
    reactions_total + comments + shares
}

/// Drop blank tags and surrounding whitespace, keeping order
fn normalize_hashtags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t != "#")
        .collect()
}

/// Prepare a user-supplied hashtag filter: strip leading `#` and lowercase
pub fn normalize_hashtag_filter(tag: &str) -> Option<String> {
    let tag = tag.trim().trim_start_matches('#').to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

/// Category label for a trending tag
pub fn infer_topic_category(tag: &str) -> &'static str {
    let lower = tag.to_lowercase();
    if ["ipl", "cricket", "indv"].iter().any(|k| lower.contains(k)) {
        "cricket"
    } else if ["oscar", "cannes", "festival"].iter().any(|k| lower.contains(k)) {
        "event"
    } else if lower.starts_with('#') {
        "movie"
    } else {
        "general"
    }
}
