//! Test fixtures and data generators
//!
//! Request bodies are typed; responses are read as `serde_json::Value` so
//! tests assert on the exact camelCase wire format.

use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A seeded user and a bearer token for it
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create pulse request
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePulseRequest {
    pub content_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_movie_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_as_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_content: Option<LinkedContent>,
}

/// Generic linked entity attached to a pulse
#[derive(Debug, Serialize)]
pub struct LinkedContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub title: String,
}

impl CreatePulseRequest {
    pub fn text(content: &str) -> Self {
        Self {
            content_text: content.to_string(),
            ..Default::default()
        }
    }

    pub fn unique() -> Self {
        Self::text(&format!("Just watched something great #{}", unique_suffix()))
    }

    /// A critic review that rates without linking a movie
    pub fn unlinked_critic_review(stars: i16) -> Self {
        Self {
            content_text: "Masterpiece".to_string(),
            posted_as_role: Some("critic".to_string()),
            star_rating: Some(stars),
            ..Default::default()
        }
    }

    /// A pulse linked to a generic entity instead of a catalogue movie
    pub fn linked(kind: &str, id: &str, title: &str) -> Self {
        Self {
            content_text: format!("Talking about {title}"),
            linked_content: Some(LinkedContent {
                kind: kind.to_string(),
                id: id.to_string(),
                title: title.to_string(),
            }),
            ..Default::default()
        }
    }
}

/// Toggle reaction request
#[derive(Debug, Serialize)]
pub struct ReactionRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ReactionRequest {
    pub fn of(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// Add comment request
#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

/// Create conversation request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub participant_ids: Vec<String>,
}

impl CreateConversationRequest {
    pub fn with(users: &[&TestUser]) -> Self {
        Self {
            participant_ids: users.iter().map(|u| u.id.clone()).collect(),
        }
    }
}

/// Send message request
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl SendMessageRequest {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            media_url: None,
        }
    }
}

/// Read a string field, panicking with the full body when absent
pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field {field} in {value}"))
}

/// Read an integer field, panicking with the full body when absent
pub fn int_field(value: &Value, field: &str) -> i64 {
    value[field]
        .as_i64()
        .unwrap_or_else(|| panic!("missing integer field {field} in {value}"))
}
