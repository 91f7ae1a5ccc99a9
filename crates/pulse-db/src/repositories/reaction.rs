//! PostgreSQL implementation of ReactionRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use pulse_core::entities::{
    resolve_toggle, ReactionCounts, ReactionToggle, ReactionType, ToggleOutcome,
};
use pulse_core::error::DomainError;
use pulse_core::traits::{ReactionRepository, RepoResult};
use pulse_core::value_objects::Snowflake;

use crate::models::{ReactionCountsModel, UserReactionModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Counter update for a toggle outcome; column names come from [`ReactionType::column`]
fn counter_update_sql(outcome: ToggleOutcome, kind: ReactionType) -> String {
    let col = kind.column();
    match outcome {
        ToggleOutcome::Added => format!(
            "UPDATE pulses SET {col} = {col} + 1, reactions_total = reactions_total + 1 WHERE id = $1"
        ),
        ToggleOutcome::Removed => format!(
            "UPDATE pulses SET {col} = GREATEST({col} - 1, 0), \
             reactions_total = GREATEST(reactions_total - 1, 0) WHERE id = $1"
        ),
        ToggleOutcome::Switched { from } => {
            let old = from.column();
            format!("UPDATE pulses SET {old} = GREATEST({old} - 1, 0), {col} = {col} + 1 WHERE id = $1")
        }
    }
}

/// Parse a stored `reaction_type`; an unknown value is a data error, never "no reaction"
fn parse_stored_reaction(raw: &str) -> RepoResult<ReactionType> {
    raw.parse::<ReactionType>().map_err(|_| {
        DomainError::DatabaseError(format!("Unknown stored reaction type: {}", raw))
    })
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        pulse_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionType,
    ) -> RepoResult<ReactionToggle> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock the pulse row so concurrent toggles on it serialize
        let locked = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM pulses WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(pulse_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(DomainError::PulseNotFound(pulse_id));
        }

        let existing = sqlx::query_scalar::<_, String>(
            "SELECT reaction_type FROM pulse_reactions WHERE pulse_id = $1 AND user_id = $2",
        )
        .bind(pulse_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .as_deref()
        .map(parse_stored_reaction)
        .transpose()?;

        let outcome = resolve_toggle(existing, kind);
        debug!(?outcome, "Resolved reaction toggle");

        match outcome {
            ToggleOutcome::Added => {
                sqlx::query(
                    r"
                    INSERT INTO pulse_reactions (pulse_id, user_id, reaction_type, created_at)
                    VALUES ($1, $2, $3, NOW())
                    ",
                )
                .bind(pulse_id.into_inner())
                .bind(user_id.into_inner())
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            ToggleOutcome::Removed => {
                sqlx::query("DELETE FROM pulse_reactions WHERE pulse_id = $1 AND user_id = $2")
                    .bind(pulse_id.into_inner())
                    .bind(user_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            ToggleOutcome::Switched { .. } => {
                sqlx::query(
                    r"
                    UPDATE pulse_reactions SET reaction_type = $3, created_at = NOW()
                    WHERE pulse_id = $1 AND user_id = $2
                    ",
                )
                .bind(pulse_id.into_inner())
                .bind(user_id.into_inner())
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        sqlx::query(&counter_update_sql(outcome, kind))
            .bind(pulse_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let counts = sqlx::query_as::<_, ReactionCountsModel>(
            r"
            SELECT reactions_love, reactions_fire, reactions_mindblown, reactions_laugh,
                   reactions_sad, reactions_angry, reactions_total
            FROM pulses WHERE id = $1
            ",
        )
        .bind(pulse_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        let total = counts.reactions_total;
        Ok(ReactionToggle {
            counts: ReactionCounts::from(counts),
            total,
            user_reaction: (outcome != ToggleOutcome::Removed).then_some(kind),
            outcome,
        })
    }

    #[instrument(skip(self, pulse_ids), fields(count = pulse_ids.len()))]
    async fn find_for_user(
        &self,
        user_id: Snowflake,
        pulse_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, ReactionType>> {
        if pulse_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i64> = pulse_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, UserReactionModel>(
            r"
            SELECT pulse_id, reaction_type
            FROM pulse_reactions
            WHERE user_id = $1 AND pulse_id = ANY($2)
            ",
        )
        .bind(user_id.into_inner())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(|r| {
                let kind = parse_stored_reaction(&r.reaction_type)?;
                Ok((Snowflake::new(r.pulse_id), kind))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionRepository>();
    }

    #[test]
    fn test_counter_updates() {
        let added = counter_update_sql(ToggleOutcome::Added, ReactionType::Fire);
        assert!(added.contains("reactions_fire = reactions_fire + 1"));
        assert!(added.contains("reactions_total = reactions_total + 1"));

        let removed = counter_update_sql(ToggleOutcome::Removed, ReactionType::Sad);
        assert!(removed.contains("GREATEST(reactions_sad - 1, 0)"));
        assert!(removed.contains("GREATEST(reactions_total - 1, 0)"));

        let switched = counter_update_sql(
            ToggleOutcome::Switched {
                from: ReactionType::Love,
            },
            ReactionType::Laugh,
        );
        assert!(switched.contains("GREATEST(reactions_love - 1, 0)"));
        assert!(switched.contains("reactions_laugh = reactions_laugh + 1"));
        assert!(!switched.contains("reactions_total"));
    }

    #[test]
    fn test_stored_reaction_parse() {
        assert_eq!(parse_stored_reaction("mindblown").unwrap(), ReactionType::Mindblown);

        let err = parse_stored_reaction("meh").unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(msg) if msg.contains("meh")));
    }
}
