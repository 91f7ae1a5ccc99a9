//! PostgreSQL implementation of DirectMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::DirectMessage;
use pulse_core::error::DomainError;
use pulse_core::traits::{DirectMessageRepository, RepoResult};
use pulse_core::value_objects::{PageRequest, Snowflake};

use crate::models::DirectMessageModel;

use super::error::{map_db_error, map_fk_violation};

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, sender_id, content, media_url, created_at, updated_at";

/// PostgreSQL implementation of DirectMessageRepository
#[derive(Clone)]
pub struct PgDirectMessageRepository {
    pool: PgPool,
}

impl PgDirectMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectMessageRepository for PgDirectMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id, conversation_id = %message.conversation_id))]
    async fn create(&self, message: &DirectMessage) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO direct_messages
                (id, conversation_id, sender_id, content, media_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.conversation_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.content)
        .bind(message.media_url.as_deref())
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_fk_violation(e, || DomainError::ConversationNotFound(message.conversation_id))
        })?;

        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(message.conversation_id.into_inner())
            .bind(message.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DirectMessage>> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM direct_messages WHERE id = $1");
        let result = sqlx::query_as::<_, DirectMessageModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(DirectMessage::from))
    }

    #[instrument(skip(self))]
    async fn find_page(
        &self,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<DirectMessage>> {
        let sql = format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM direct_messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        );
        let results = sqlx::query_as::<_, DirectMessageModel>(&sql)
            .bind(conversation_id.into_inner())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        // Newest page first from the database, shown oldest first
        Ok(results.into_iter().rev().map(DirectMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_in(&self, conversation_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM direct_messages WHERE conversation_id = $1",
        )
        .bind(conversation_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn latest_in(&self, conversation_id: Snowflake) -> RepoResult<Option<DirectMessage>> {
        let sql = format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM direct_messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "
        );
        let result = sqlx::query_as::<_, DirectMessageModel>(&sql)
            .bind(conversation_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(DirectMessage::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM direct_messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unread_count_in(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM direct_messages m
            JOIN conversation_participants cp
              ON cp.conversation_id = m.conversation_id AND cp.user_id = $2
            WHERE m.conversation_id = $1
              AND m.sender_id <> $2
              AND (cp.last_read_at IS NULL OR m.created_at > cp.last_read_at)
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn unread_count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM direct_messages m
            JOIN conversation_participants cp
              ON cp.conversation_id = m.conversation_id AND cp.user_id = $1
            WHERE m.sender_id <> $1
              AND (cp.last_read_at IS NULL OR m.created_at > cp.last_read_at)
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
