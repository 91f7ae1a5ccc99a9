//! User and movie database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// `users` joined with the visibility from `user_settings`
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// NULL when the user has no settings row
    pub profile_visibility: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database model for movies table
#[derive(Debug, Clone, FromRow)]
pub struct MovieModel {
    pub id: i64,
    pub external_id: String,
    pub title: String,
    pub poster_url: Option<String>,
}
