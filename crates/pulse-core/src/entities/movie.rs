//! Movie catalogue entry and generic linked content

use serde::{Deserialize, Serialize};

/// Catalogue movie a pulse can link to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// Internal row ID
    pub id: i64,
    /// Public catalogue identifier
    pub external_id: String,
    pub title: String,
    pub poster_url: Option<String>,
}

/// Entity a pulse links to, either a catalogue movie or something generic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedContent {
    /// "movie" for catalogue links, free-form otherwise
    pub kind: String,
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
}

impl LinkedContent {
    pub const MOVIE: &'static str = "movie";

    pub fn is_movie(&self) -> bool {
        self.kind == Self::MOVIE
    }
}

impl From<&Movie> for LinkedContent {
    fn from(movie: &Movie) -> Self {
        Self {
            kind: Self::MOVIE.to_string(),
            id: movie.external_id.clone(),
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}
