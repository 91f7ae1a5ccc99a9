//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::Comment;
use pulse_core::error::DomainError;
use pulse_core::traits::{CommentRepository, RepoResult};
use pulse_core::value_objects::{PageRequest, Snowflake};

use crate::models::CommentModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self, comment), fields(comment_id = %comment.id, pulse_id = %comment.pulse_id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO pulse_comments (id, pulse_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.pulse_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::PulseNotFound(comment.pulse_id)))?;

        sqlx::query("UPDATE pulses SET comments_count = comments_count + 1 WHERE id = $1")
            .bind(comment.pulse_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, pulse_id, user_id, content, created_at
            FROM pulse_comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn list_by_pulse(
        &self,
        pulse_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, pulse_id, user_id, content, created_at
            FROM pulse_comments
            WHERE pulse_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(pulse_id.into_inner())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_pulse(&self, pulse_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pulse_comments WHERE pulse_id = $1")
            .bind(pulse_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn delete(&self, comment: &Comment) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let deleted = sqlx::query("DELETE FROM pulse_comments WHERE id = $1")
            .bind(comment.id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(comment.id));
        }

        sqlx::query(
            "UPDATE pulses SET comments_count = GREATEST(comments_count - 1, 0) WHERE id = $1",
        )
        .bind(comment.pulse_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCommentRepository>();
    }
}
