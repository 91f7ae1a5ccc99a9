//! PostgreSQL implementation of PulseRepository, including the feed query

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use pulse_core::entities::{FeedPulse, Pulse};
use pulse_core::error::DomainError;
use pulse_core::traits::{FeedQuery, PulseRepository, RepoResult};
use pulse_core::value_objects::Snowflake;

use crate::mappers::PulseInsert;
use crate::models::{FeedPulseModel, PulseModel, TrendingTagModel};

use super::error::{contains_pattern, map_db_error, map_fk_violation};

/// Ranking expression; mirrors `pulse_core::popularity_score`
pub(crate) const POPULARITY_SQL: &str = "(p.reactions_total + p.comments_count + p.shares_count)";

const PULSE_COLUMNS: &str = r"
    p.id, p.user_id, p.content_text, p.content_media, p.linked_movie_id,
    p.linked_type, p.linked_id, p.linked_title, p.linked_poster_url, p.hashtags,
    p.reactions_love, p.reactions_fire, p.reactions_mindblown, p.reactions_laugh,
    p.reactions_sad, p.reactions_angry, p.reactions_total,
    p.comments_count, p.shares_count, p.posted_as_role, p.star_rating,
    p.created_at, p.edited_at, p.deleted_at,
    m.external_id AS movie_external_id, m.title AS movie_title,
    m.poster_url AS movie_poster_url
";

const AUTHOR_COLUMNS: &str = r"
    u.username AS author_username, u.display_name AS author_display_name,
    u.avatar_url AS author_avatar_url, s.profile_visibility AS author_visibility,
    u.created_at AS author_created_at
";

const FEED_FROM: &str = r"
    FROM pulses p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN user_settings s ON s.user_id = p.user_id
    LEFT JOIN movies m ON m.id = p.linked_movie_id
";

/// Visible to `$1` (nullable viewer): not deleted, author not private unless it is the viewer
const VISIBLE_TO_VIEWER: &str = r"
    p.deleted_at IS NULL
    AND (COALESCE(s.profile_visibility, 'public') <> 'private' OR p.user_id = $1::BIGINT)
";

fn feed_sql() -> String {
    format!(
        r"
        SELECT {PULSE_COLUMNS}, {AUTHOR_COLUMNS}
        {FEED_FROM}
        WHERE {VISIBLE_TO_VIEWER}
          AND (NOT $2::BOOLEAN OR EXISTS (
                SELECT 1 FROM user_follows f
                WHERE f.follower_id = $1::BIGINT AND f.following_id = p.user_id))
          AND ($3::TIMESTAMPTZ IS NULL OR p.created_at >= $3)
          AND ($4::TEXT IS NULL OR EXISTS (
                SELECT 1 FROM unnest(p.hashtags) AS t(tag)
                WHERE lower(t.tag) LIKE $4))
          AND ($5::TEXT IS NULL OR m.external_id = $5)
          AND ($6::TEXT IS NULL OR p.linked_type = $6)
          AND ($7::BIGINT IS NULL OR p.user_id = $7)
        ORDER BY CASE WHEN $8::BOOLEAN THEN {POPULARITY_SQL} ELSE 0 END DESC,
                 p.created_at DESC, p.id DESC
        LIMIT $9 OFFSET $10
        "
    )
}

/// PostgreSQL implementation of PulseRepository
#[derive(Clone)]
pub struct PgPulseRepository {
    pool: PgPool,
}

impl PgPulseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PulseRepository for PgPulseRepository {
    #[instrument(skip(self))]
    async fn find_active(&self, id: Snowflake) -> RepoResult<Option<Pulse>> {
        let result = sqlx::query_as::<_, PulseModel>(&format!(
            r"
            SELECT {PULSE_COLUMNS}
            FROM pulses p
            LEFT JOIN movies m ON m.id = p.linked_movie_id
            WHERE p.id = $1 AND p.deleted_at IS NULL
            "
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Pulse::from))
    }

    #[instrument(skip(self))]
    async fn find_visible(
        &self,
        id: Snowflake,
        viewer_id: Option<Snowflake>,
    ) -> RepoResult<Option<FeedPulse>> {
        let result = sqlx::query_as::<_, FeedPulseModel>(&format!(
            r"
            SELECT {PULSE_COLUMNS}, {AUTHOR_COLUMNS}
            {FEED_FROM}
            WHERE {VISIBLE_TO_VIEWER} AND p.id = $2
            "
        ))
        .bind(viewer_id.map(Snowflake::into_inner))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(FeedPulse::from))
    }

    #[instrument(skip(self, pulse), fields(pulse_id = %pulse.id))]
    async fn create(&self, pulse: &Pulse) -> RepoResult<()> {
        let insert = PulseInsert::new(pulse);

        sqlx::query(
            r"
            INSERT INTO pulses (
                id, user_id, content_text, content_media, linked_movie_id,
                linked_type, linked_id, linked_title, linked_poster_url,
                hashtags, posted_as_role, star_rating, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(insert.id)
        .bind(insert.user_id)
        .bind(insert.content_text)
        .bind(insert.media)
        .bind(insert.linked_movie_id)
        .bind(insert.linked_type)
        .bind(insert.linked_id)
        .bind(insert.linked_title)
        .bind(insert.linked_poster_url)
        .bind(insert.hashtags)
        .bind(insert.posted_as_role)
        .bind(insert.star_rating)
        .bind(pulse.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(e, || DomainError::UserNotFound(pulse.author_id.to_string()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE pulses SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_feed(&self, query: &FeedQuery) -> RepoResult<Vec<FeedPulse>> {
        if query.is_trivially_empty() {
            return Ok(Vec::new());
        }

        let following_only = query.filter == pulse_core::FeedFilter::Following;
        let hashtag = query.hashtag.as_deref().map(contains_pattern);
        debug!(filter = %query.filter, page = query.page.page, "Loading feed page");

        let results = sqlx::query_as::<_, FeedPulseModel>(&feed_sql())
            .bind(query.viewer_id.map(Snowflake::into_inner))
            .bind(following_only)
            .bind(query.created_after(Utc::now()))
            .bind(hashtag)
            .bind(query.movie_external_id.as_deref())
            .bind(query.linked_type.as_deref())
            .bind(query.author_id.map(Snowflake::into_inner))
            .bind(query.filter.ranks_by_score())
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(FeedPulse::from).collect())
    }

    #[instrument(skip(self))]
    async fn trending_tags(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<(String, i64)>> {
        let results = sqlx::query_as::<_, TrendingTagModel>(
            r"
            SELECT t.tag, COUNT(*) AS count
            FROM pulses p
            CROSS JOIN LATERAL unnest(p.hashtags) AS t(tag)
            LEFT JOIN user_settings s ON s.user_id = p.user_id
            WHERE p.deleted_at IS NULL
              AND p.created_at >= $1
              AND COALESCE(s.profile_visibility, 'public') <> 'private'
              AND t.tag <> ''
            GROUP BY t.tag
            ORDER BY count DESC, t.tag ASC
            LIMIT $2
            ",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(|r| (r.tag, r.count)).collect())
    }

    #[instrument(skip(self))]
    async fn increment_shares(&self, id: Snowflake) -> RepoResult<i64> {
        let shares = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE pulses SET shares_count = shares_count + 1
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING shares_count
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        shares.ok_or(DomainError::PulseNotFound(id))
    }

    #[instrument(skip(self))]
    async fn count_by_author(&self, author_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM pulses WHERE user_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(author_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPulseRepository>();
    }

    #[test]
    fn test_feed_sql_uses_every_placeholder() {
        let sql = feed_sql();
        for n in 1..=10 {
            assert!(sql.contains(&format!("${n}")), "missing ${n}");
        }
        assert!(sql.contains(POPULARITY_SQL));
        assert!(!sql.contains("$11"));
    }

    #[test]
    fn test_popularity_sql_matches_domain_formula() {
        // reactions_total + comments_count + shares_count, unweighted
        assert_eq!(pulse_core::popularity_score(1, 1, 1), 3);
        assert_eq!(POPULARITY_SQL.matches('+').count(), 2);
    }
}
