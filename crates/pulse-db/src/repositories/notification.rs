//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::{Notification, NotificationEntry};
use pulse_core::traits::{NotificationRepository, RepoResult};
use pulse_core::value_objects::{PageRequest, Snowflake};

use crate::models::NotificationEntryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, kind = %notification.kind))]
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        // Self-notifications are dropped here as well as in the entity constructor
        if notification.user_id == notification.actor_id {
            return Ok(());
        }

        sqlx::query(
            r"
            INSERT INTO notifications
                (id, user_id, actor_id, type, pulse_id, comment_id, content, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(notification.id.into_inner())
        .bind(notification.user_id.into_inner())
        .bind(notification.actor_id.into_inner())
        .bind(notification.kind.as_str())
        .bind(notification.pulse_id.map(Snowflake::into_inner))
        .bind(notification.comment_id.map(Snowflake::into_inner))
        .bind(notification.content.as_deref())
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        user_id: Snowflake,
        unread_only: bool,
        page: PageRequest,
    ) -> RepoResult<Vec<NotificationEntry>> {
        let results = sqlx::query_as::<_, NotificationEntryModel>(
            r"
            SELECT n.id, n.user_id, n.actor_id, n.type, n.pulse_id, n.comment_id,
                   n.content, n.is_read, n.created_at,
                   a.username AS actor_username, a.display_name AS actor_display_name,
                   a.avatar_url AS actor_avatar_url, a.created_at AS actor_created_at,
                   LEFT(p.content_text, 100) AS pulse_preview,
                   LEFT(c.content, 100) AS comment_preview
            FROM notifications n
            JOIN users a ON a.id = n.actor_id
            LEFT JOIN pulses p ON p.id = n.pulse_id
            LEFT JOIN pulse_comments c ON c.id = n.comment_id
            WHERE n.user_id = $1 AND (NOT $2 OR NOT n.is_read)
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(user_id.into_inner())
        .bind(unread_only)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(NotificationEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, user_id: Snowflake, unread_only: bool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR NOT is_read)",
        )
        .bind(user_id.into_inner())
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        self.count(user_id, true).await
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, user_id: Snowflake, id: Snowflake) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id.into_inner())
                .bind(user_id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: Snowflake, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgNotificationRepository>();
    }
}
