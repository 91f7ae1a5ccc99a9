//! User and movie model -> entity mappers

use pulse_core::entities::{Movie, ProfileVisibility, User};
use pulse_core::value_objects::Snowflake;

use crate::models::{MovieModel, UserModel};

/// Missing or unrecognised settings read as public
pub fn visibility_from_db(value: Option<&str>) -> ProfileVisibility {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            visibility: visibility_from_db(model.profile_visibility.as_deref()),
            created_at: model.created_at,
        }
    }
}

impl From<MovieModel> for Movie {
    fn from(model: MovieModel) -> Self {
        Movie {
            id: model.id,
            external_id: model.external_id,
            title: model.title,
            poster_url: model.poster_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_defaults_to_public() {
        assert_eq!(visibility_from_db(None), ProfileVisibility::Public);
        assert_eq!(visibility_from_db(Some("nonsense")), ProfileVisibility::Public);
        assert_eq!(visibility_from_db(Some("private")), ProfileVisibility::Private);
    }
}
