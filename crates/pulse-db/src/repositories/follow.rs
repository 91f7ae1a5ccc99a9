//! PostgreSQL implementations of FollowRepository and BookmarkRepository
//!
//! Both are plain set memberships; inserts use `ON CONFLICT DO NOTHING` so
//! repeating an action is a no-op and the affected row count says whether
//! anything changed.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::User;
use pulse_core::error::DomainError;
use pulse_core::traits::{BookmarkRepository, FollowRepository, RepoResult};
use pulse_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{map_db_error, map_fk_violation};
use super::user::USER_SELECT;

fn suggestions_sql() -> String {
    format!(
        r"
        {USER_SELECT}
        WHERE COALESCE(s.profile_visibility, 'public') <> 'private'
          AND ($1::BIGINT IS NULL OR (
                u.id <> $1
                AND NOT EXISTS (
                    SELECT 1 FROM user_follows f
                    WHERE f.follower_id = $1 AND f.following_id = u.id)))
        ORDER BY (SELECT COUNT(*) FROM user_follows f WHERE f.following_id = u.id) DESC,
                 u.created_at DESC, u.id DESC
        LIMIT $2
        "
    )
}

/// PostgreSQL implementation of FollowRepository
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    #[instrument(skip(self))]
    async fn follow(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        if follower_id == following_id {
            return Err(DomainError::CannotFollowSelf);
        }

        let result = sqlx::query(
            r"
            INSERT INTO user_follows (follower_id, following_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (follower_id, following_id) DO NOTHING
            ",
        )
        .bind(follower_id.into_inner())
        .bind(following_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::UserNotFound(following_id.to_string())))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn unfollow(
        &self,
        follower_id: Snowflake,
        following_id: Snowflake,
    ) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM user_follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id.into_inner())
                .bind(following_id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn is_following(
        &self,
        follower_id: Snowflake,
        following_id: Snowflake,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM user_follows WHERE follower_id = $1 AND following_id = $2
            )
            ",
        )
        .bind(follower_id.into_inner())
        .bind(following_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn follower_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_follows WHERE following_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn following_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_follows WHERE follower_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn suggestions(
        &self,
        viewer_id: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(&suggestions_sql())
            .bind(viewer_id.map(Snowflake::into_inner))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }
}

/// PostgreSQL implementation of BookmarkRepository
#[derive(Clone)]
pub struct PgBookmarkRepository {
    pool: PgPool,
}

impl PgBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkRepository for PgBookmarkRepository {
    #[instrument(skip(self))]
    async fn add(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO pulse_bookmarks (user_id, pulse_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, pulse_id) DO NOTHING
            ",
        )
        .bind(user_id.into_inner())
        .bind(pulse_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::PulseNotFound(pulse_id)))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM pulse_bookmarks WHERE user_id = $1 AND pulse_id = $2")
                .bind(user_id.into_inner())
                .bind(pulse_id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: Snowflake, pulse_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM pulse_bookmarks WHERE user_id = $1 AND pulse_id = $2
            )
            ",
        )
        .bind(user_id.into_inner())
        .bind(pulse_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
