//! Notification service

use pulse_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    MarkedResponse, NotificationListResponse, NotificationParams, NotificationResponse,
    PageParams, UnreadCountResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default page size for the notification list
const DEFAULT_LIMIT: i64 = 20;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The user's notifications, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Snowflake,
        params: NotificationParams,
    ) -> ServiceResult<NotificationListResponse> {
        let unread_only = params.unread_only.unwrap_or(false);
        let page = PageParams {
            page: params.page,
            limit: params.limit,
        }
        .to_page(DEFAULT_LIMIT);

        let repo = self.ctx.notification_repo();
        let entries = repo.list(user_id, unread_only, page).await?;
        let total = repo.count(user_id, unread_only).await?;
        let unread_count = repo.unread_count(user_id).await?;

        Ok(NotificationListResponse {
            notifications: entries.into_iter().map(NotificationResponse::from).collect(),
            page: page.page,
            limit: page.limit,
            has_more: page.has_more(total),
            unread_count,
        })
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<UnreadCountResponse> {
        let unread_count = self.ctx.notification_repo().unread_count(user_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    /// Mark one notification read; other users' notifications look missing
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Snowflake, id: Snowflake) -> ServiceResult<()> {
        if !self.ctx.notification_repo().mark_read(user_id, id).await? {
            return Err(DomainError::NotificationNotFound(id).into());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Snowflake) -> ServiceResult<MarkedResponse> {
        let marked = self.ctx.notification_repo().mark_all_read(user_id).await?;
        info!(user_id = %user_id, marked, "Notifications marked read");
        Ok(MarkedResponse { marked })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, id: Snowflake) -> ServiceResult<()> {
        if !self.ctx.notification_repo().delete(user_id, id).await? {
            return Err(DomainError::NotificationNotFound(id).into());
        }
        Ok(())
    }
}
