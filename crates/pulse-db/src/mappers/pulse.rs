//! Pulse model -> entity mappers

use pulse_core::entities::{
    Comment, FeedPulse, LinkedContent, Pulse, ReactionCounts, User,
};
use pulse_core::value_objects::Snowflake;

use crate::models::{CommentModel, FeedPulseModel, PulseModel, ReactionCountsModel};

use super::user::visibility_from_db;

/// Catalogue columns win over the denormalized generic link
fn linked_content(model: &PulseModel) -> Option<LinkedContent> {
    if let (Some(id), Some(title)) = (&model.movie_external_id, &model.movie_title) {
        return Some(LinkedContent {
            kind: LinkedContent::MOVIE.to_string(),
            id: id.clone(),
            title: title.clone(),
            poster_url: model.movie_poster_url.clone(),
        });
    }
    match (&model.linked_type, &model.linked_id) {
        (Some(kind), Some(id)) => Some(LinkedContent {
            kind: kind.clone(),
            id: id.clone(),
            title: model.linked_title.clone().unwrap_or_default(),
            poster_url: model.linked_poster_url.clone(),
        }),
        _ => None,
    }
}

impl From<ReactionCountsModel> for ReactionCounts {
    fn from(model: ReactionCountsModel) -> Self {
        ReactionCounts {
            love: model.reactions_love,
            fire: model.reactions_fire,
            mindblown: model.reactions_mindblown,
            laugh: model.reactions_laugh,
            sad: model.reactions_sad,
            angry: model.reactions_angry,
        }
    }
}

impl From<PulseModel> for Pulse {
    fn from(model: PulseModel) -> Self {
        let linked = linked_content(&model);
        Pulse {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.user_id),
            content_text: model.content_text,
            media: model.content_media,
            linked_movie_id: model.linked_movie_id,
            linked,
            hashtags: model.hashtags,
            reactions: ReactionCounts {
                love: model.reactions_love,
                fire: model.reactions_fire,
                mindblown: model.reactions_mindblown,
                laugh: model.reactions_laugh,
                sad: model.reactions_sad,
                angry: model.reactions_angry,
            },
            reactions_total: model.reactions_total,
            comments_count: model.comments_count,
            shares_count: model.shares_count,
            posted_as_role: model.posted_as_role.as_deref().and_then(|r| r.parse().ok()),
            star_rating: model.star_rating,
            created_at: model.created_at,
            edited_at: model.edited_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl From<FeedPulseModel> for FeedPulse {
    fn from(model: FeedPulseModel) -> Self {
        let author = User {
            id: Snowflake::new(model.pulse.user_id),
            username: model.author_username,
            display_name: model.author_display_name,
            avatar_url: model.author_avatar_url,
            visibility: visibility_from_db(model.author_visibility.as_deref()),
            created_at: model.author_created_at,
        };
        FeedPulse {
            pulse: Pulse::from(model.pulse),
            author,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            pulse_id: Snowflake::new(model.pulse_id),
            author_id: Snowflake::new(model.user_id),
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// Values bound when inserting a pulse
pub struct PulseInsert<'a> {
    pub id: i64,
    pub user_id: i64,
    pub content_text: &'a str,
    pub media: &'a [String],
    pub linked_movie_id: Option<i64>,
    pub linked_type: Option<&'a str>,
    pub linked_id: Option<&'a str>,
    pub linked_title: Option<&'a str>,
    pub linked_poster_url: Option<&'a str>,
    pub hashtags: &'a [String],
    pub posted_as_role: Option<&'static str>,
    pub star_rating: Option<i16>,
}

impl<'a> PulseInsert<'a> {
    pub fn new(pulse: &'a Pulse) -> Self {
        let linked = pulse.linked.as_ref();
        Self {
            id: pulse.id.into_inner(),
            user_id: pulse.author_id.into_inner(),
            content_text: &pulse.content_text,
            media: &pulse.media,
            linked_movie_id: pulse.linked_movie_id,
            linked_type: linked.map(|l| l.kind.as_str()),
            linked_id: linked.map(|l| l.id.as_str()),
            linked_title: linked.map(|l| l.title.as_str()),
            linked_poster_url: linked.and_then(|l| l.poster_url.as_deref()),
            hashtags: &pulse.hashtags,
            posted_as_role: pulse.posted_as_role.map(|r| r.as_str()),
            star_rating: pulse.star_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_core::entities::PostingRole;

    fn model() -> PulseModel {
        PulseModel {
            id: 10,
            user_id: 2,
            content_text: "Dune rewatch".to_string(),
            content_media: vec![],
            linked_movie_id: None,
            linked_type: None,
            linked_id: None,
            linked_title: None,
            linked_poster_url: None,
            hashtags: vec!["#Dune".to_string()],
            reactions_love: 2,
            reactions_fire: 1,
            reactions_mindblown: 0,
            reactions_laugh: 0,
            reactions_sad: 0,
            reactions_angry: 0,
            reactions_total: 3,
            comments_count: 4,
            shares_count: 1,
            posted_as_role: Some("critic".to_string()),
            star_rating: None,
            created_at: Utc::now(),
            edited_at: None,
            deleted_at: None,
            movie_external_id: None,
            movie_title: None,
            movie_poster_url: None,
        }
    }

    #[test]
    fn test_pulse_mapping() {
        let pulse = Pulse::from(model());
        assert_eq!(pulse.id, Snowflake::new(10));
        assert_eq!(pulse.reactions.love, 2);
        assert_eq!(pulse.posted_as_role, Some(PostingRole::Critic));
        assert_eq!(pulse.popularity(), 8);
        assert!(pulse.linked.is_none());
    }

    #[test]
    fn test_movie_columns_take_precedence() {
        let mut m = model();
        m.linked_movie_id = Some(3);
        m.linked_type = Some("movie".to_string());
        m.linked_id = Some("stale".to_string());
        m.movie_external_id = Some("tt1160419".to_string());
        m.movie_title = Some("Dune".to_string());

        let linked = Pulse::from(m).linked.unwrap();
        assert!(linked.is_movie());
        assert_eq!(linked.id, "tt1160419");
    }

    #[test]
    fn test_generic_link() {
        let mut m = model();
        m.linked_type = Some("series".to_string());
        m.linked_id = Some("s-42".to_string());
        m.linked_title = Some("Severance".to_string());

        let linked = Pulse::from(m).linked.unwrap();
        assert_eq!(linked.kind, "series");
        assert_eq!(linked.title, "Severance");
    }
}
