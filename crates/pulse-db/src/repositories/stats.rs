//! PostgreSQL implementation of StatsRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use pulse_core::entities::{DailyStat, StatCounter};
use pulse_core::traits::{RepoResult, StatsRepository};
use pulse_core::value_objects::Snowflake;

use crate::models::DailyStatModel;

use super::error::map_db_error;

/// PostgreSQL implementation of StatsRepository
#[derive(Clone)]
pub struct PgStatsRepository {
    pool: PgPool,
}

impl PgStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Single-statement upsert; creates the day row on first use
fn increment_sql(counter: StatCounter) -> String {
    let col = counter.column();
    format!(
        r"
        INSERT INTO user_daily_stats (user_id, stat_date, {col})
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, stat_date)
        DO UPDATE SET {col} = user_daily_stats.{col} + 1
        "
    )
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    #[instrument(skip(self))]
    async fn increment(
        &self,
        user_id: Snowflake,
        date: NaiveDate,
        counter: StatCounter,
    ) -> RepoResult<()> {
        sqlx::query(&increment_sql(counter))
            .bind(user_id.into_inner())
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_day(&self, user_id: Snowflake, date: NaiveDate) -> RepoResult<Option<DailyStat>> {
        let result = sqlx::query_as::<_, DailyStatModel>(
            r"
            SELECT user_id, stat_date, pulses_posted, likes_received,
                   new_followers, comments_received
            FROM user_daily_stats
            WHERE user_id = $1 AND stat_date = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(DailyStat::from))
    }

    #[instrument(skip(self))]
    async fn find_range(
        &self,
        user_id: Snowflake,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<DailyStat>> {
        let results = sqlx::query_as::<_, DailyStatModel>(
            r"
            SELECT user_id, stat_date, pulses_posted, likes_received,
                   new_followers, comments_received
            FROM user_daily_stats
            WHERE user_id = $1 AND stat_date BETWEEN $2 AND $3
            ORDER BY stat_date ASC
            ",
        )
        .bind(user_id.into_inner())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(DailyStat::from).collect())
    }
}
