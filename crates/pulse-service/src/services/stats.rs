//! Daily activity stats
//!
//! Days without a stored row read as all-zero; ranges only return the days
//! that have rows.

use chrono::{NaiveDate, Utc};
use pulse_core::entities::trailing_range;
use pulse_core::{DailyStat, DomainError, Snowflake, StatTotals};
use tracing::instrument;

use crate::dto::{DailyStatResponse, StatsRangeResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Stats service
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Today's counters for a user
    #[instrument(skip(self))]
    pub async fn today(&self, user_id: Snowflake) -> ServiceResult<DailyStatResponse> {
        self.ensure_user(user_id).await?;

        let today = Utc::now().date_naive();
        let stat = self
            .ctx
            .stats_repo()
            .find_day(user_id, today)
            .await?
            .unwrap_or_else(|| DailyStat::empty(user_id, today));

        Ok(DailyStatResponse::from(&stat))
    }

    /// Last 7 days including today
    pub async fn week(&self, user_id: Snowflake) -> ServiceResult<StatsRangeResponse> {
        self.trailing(user_id, 7).await
    }

    /// Last 30 days including today
    pub async fn month(&self, user_id: Snowflake) -> ServiceResult<StatsRangeResponse> {
        self.trailing(user_id, 30).await
    }

    /// Inclusive custom range
    #[instrument(skip(self))]
    pub async fn range(
        &self,
        user_id: Snowflake,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<StatsRangeResponse> {
        if start > end {
            return Err(ServiceError::validation("start must not be after end"));
        }
        self.ensure_user(user_id).await?;
        self.load_range(user_id, start, end).await
    }

    #[instrument(skip(self))]
    async fn trailing(&self, user_id: Snowflake, days: i64) -> ServiceResult<StatsRangeResponse> {
        self.ensure_user(user_id).await?;
        let (start, end) = trailing_range(Utc::now().date_naive(), days);
        self.load_range(user_id, start, end).await
    }

    async fn load_range(
        &self,
        user_id: Snowflake,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<StatsRangeResponse> {
        let days = self.ctx.stats_repo().find_range(user_id, start, end).await?;

        Ok(StatsRangeResponse {
            start_date: start,
            end_date: end,
            totals: StatTotals::sum(&days),
            daily: days.iter().map(DailyStatResponse::from).collect(),
        })
    }

    async fn ensure_user(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;
        Ok(())
    }
}
