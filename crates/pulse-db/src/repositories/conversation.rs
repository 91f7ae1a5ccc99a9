//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use pulse_core::entities::{Conversation, Participant};
use pulse_core::error::DomainError;
use pulse_core::traits::{ConversationRepository, RepoResult};
use pulse_core::value_objects::{PageRequest, Snowflake};

use crate::models::{ConversationModel, ParticipantModel};

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sorted_ids(user_ids: &[Snowflake]) -> Vec<i64> {
    let mut ids: Vec<i64> = user_ids.iter().map(|id| id.into_inner()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self, user_ids), fields(participants = user_ids.len()))]
    async fn find_by_exact_participants(
        &self,
        user_ids: &[Snowflake],
    ) -> RepoResult<Option<Conversation>> {
        let ids = sorted_ids(user_ids);

        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT c.id, c.created_at, c.last_message_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            GROUP BY c.id
            HAVING array_agg(cp.user_id ORDER BY cp.user_id) = $1::BIGINT[]
            ORDER BY c.created_at ASC
            LIMIT 1
            ",
        )
        .bind(&ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self, conversation, user_ids), fields(conversation_id = %conversation.id))]
    async fn create(&self, conversation: &Conversation, user_ids: &[Snowflake]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            "INSERT INTO conversations (id, created_at, last_message_at) VALUES ($1, $2, $3)",
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.created_at)
        .bind(conversation.last_message_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for user_id in sorted_ids(user_ids) {
            sqlx::query(
                r"
                INSERT INTO conversation_participants (conversation_id, user_id, joined_at)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(conversation.id.into_inner())
            .bind(user_id)
            .bind(conversation.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_fk_violation(e, || DomainError::UserNotFound(user_id.to_string())))?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            "SELECT id, created_at, last_message_at FROM conversations WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT conversation_id, user_id, joined_at, last_read_at
            FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = $2
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn list_participants(&self, conversation_id: Snowflake) -> RepoResult<Vec<Participant>> {
        let results = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT conversation_id, user_id, joined_at, last_read_at
            FROM conversation_participants
            WHERE conversation_id = $1
            ORDER BY joined_at ASC, user_id ASC
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<Conversation>> {
        let results = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT c.id, c.created_at, c.last_message_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.user_id = $1
            ORDER BY COALESCE(c.last_message_at, c.created_at) DESC, c.id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Conversation::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM conversation_participants WHERE user_id = $1",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        // Bound from the application clock, which also stamps message created_at
        let result = sqlx::query(
            r"
            UPDATE conversation_participants SET last_read_at = $3
            WHERE conversation_id = $1 AND user_id = $2
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotParticipant);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            "DELETE FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if removed.rows_affected() == 0 {
            return Err(DomainError::NotParticipant);
        }

        let remaining = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM conversation_participants WHERE conversation_id = $1",
        )
        .bind(conversation_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let deleted = remaining == 0;
        if deleted {
            // Messages go with it via ON DELETE CASCADE
            sqlx::query("DELETE FROM conversations WHERE id = $1")
                .bind(conversation_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            debug!(conversation_id = %conversation_id, "Deleted empty conversation");
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgConversationRepository>();
    }

    #[test]
    fn test_sorted_ids_matches_array_agg_order() {
        let ids = [Snowflake::new(30), Snowflake::new(10), Snowflake::new(20), Snowflake::new(10)];
        assert_eq!(sorted_ids(&ids), vec![10, 20, 30]);
    }
}
