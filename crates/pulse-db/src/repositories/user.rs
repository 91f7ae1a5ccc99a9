//! PostgreSQL implementations of UserRepository and MovieRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::{Movie, ProfileVisibility, User};
use pulse_core::error::DomainError;
use pulse_core::traits::{MovieRepository, RepoResult, UserRepository};
use pulse_core::value_objects::Snowflake;

use crate::models::{MovieModel, UserModel};

use super::error::{map_db_error, map_unique_violation};

pub(crate) const USER_SELECT: &str = r"
    SELECT u.id, u.username, u.display_name, u.avatar_url,
           s.profile_visibility, u.created_at
    FROM users u
    LEFT JOIN user_settings s ON s.user_id = u.id
";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results =
            sqlx::query_as::<_, UserModel>(&format!("{USER_SELECT} WHERE u.id = ANY($1)"))
                .bind(&ids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "{USER_SELECT} WHERE lower(u.username) = lower($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_usernames(&self, usernames: &[String]) -> RepoResult<Vec<User>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        let lowered: Vec<String> = usernames.iter().map(|u| u.to_lowercase()).collect();

        let results = sqlx::query_as::<_, UserModel>(&format!(
            "{USER_SELECT} WHERE lower(u.username) = ANY($1)"
        ))
        .bind(&lowered)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, display_name, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(user.display_name.as_deref())
        .bind(user.avatar_url.as_deref())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("Username {} is taken", user.username))
            })
        })?;

        if user.visibility != ProfileVisibility::Public {
            self.set_visibility(user.id, user.visibility).await?;
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_visibility(
        &self,
        id: Snowflake,
        visibility: ProfileVisibility,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_settings (user_id, profile_visibility, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET profile_visibility = EXCLUDED.profile_visibility, updated_at = NOW()
            ",
        )
        .bind(id.into_inner())
        .bind(visibility.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

/// PostgreSQL implementation of MovieRepository
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    #[instrument(skip(self))]
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Movie>> {
        let result = sqlx::query_as::<_, MovieModel>(
            r"
            SELECT id, external_id, title, poster_url
            FROM movies
            WHERE external_id = $1
            ",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Movie::from))
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        external_id: &str,
        title: &str,
        poster_url: Option<&str>,
    ) -> RepoResult<Movie> {
        let model = sqlx::query_as::<_, MovieModel>(
            r"
            INSERT INTO movies (external_id, title, poster_url)
            VALUES ($1, $2, $3)
            RETURNING id, external_id, title, poster_url
            ",
        )
        .bind(external_id)
        .bind(title)
        .bind(poster_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("Movie {external_id} already exists"))
            })
        })?;

        Ok(Movie::from(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgUserRepository>();
        assert_send_sync::<PgMovieRepository>();
    }
}
