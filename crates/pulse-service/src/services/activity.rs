//! Activity fan-out
//!
//! Notifications and daily stat bumps that follow a successful mutation.
//! They run inline after the primary write has committed; a failure is
//! logged and swallowed so the caller's request still succeeds.

use chrono::Utc;
use pulse_core::entities::extract_mentions;
use pulse_core::{Notification, NotificationType, Pulse, Snowflake, StatCounter};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;

/// Side-effect dispatcher for notifications and stats
pub struct ActivityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a notification; `None` (self-action) is a no-op
    #[instrument(skip(self, notification))]
    pub async fn notify(&self, notification: Option<Notification>) {
        let Some(notification) = notification else {
            return;
        };
        if let Err(e) = self.ctx.notification_repo().create(&notification).await {
            warn!(
                error = %e,
                user_id = %notification.user_id,
                kind = %notification.kind,
                "Failed to create notification"
            );
        }
    }

    /// Build and store a notification of `kind` from `actor` to `user`
    pub async fn notify_user(
        &self,
        user_id: Snowflake,
        actor_id: Snowflake,
        kind: NotificationType,
        build: impl FnOnce(Notification) -> Notification,
    ) {
        let notification =
            Notification::new(self.ctx.generate_id(), user_id, actor_id, kind).map(build);
        self.notify(notification).await;
    }

    /// Bump today's counter for `user_id`
    #[instrument(skip(self))]
    pub async fn bump(&self, user_id: Snowflake, counter: StatCounter) {
        let today = Utc::now().date_naive();
        if let Err(e) = self.ctx.stats_repo().increment(user_id, today, counter).await {
            warn!(error = %e, user_id = %user_id, counter = ?counter, "Failed to record daily stat");
        }
    }

    /// Bump a "received" counter unless the actor is acting on their own content
    pub async fn bump_received(&self, owner_id: Snowflake, actor_id: Snowflake, counter: StatCounter) {
        if owner_id != actor_id {
            self.bump(owner_id, counter).await;
        }
    }

    /// Notify every `@username` resolvable in the pulse text, once each
    #[instrument(skip(self, pulse), fields(pulse_id = %pulse.id))]
    pub async fn notify_mentions(&self, pulse: &Pulse) {
        let handles = extract_mentions(&pulse.content_text);
        if handles.is_empty() {
            return;
        }

        let users = match self.ctx.user_repo().find_by_usernames(&handles).await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Failed to resolve mentions");
                return;
            }
        };

        let mut notified: Vec<Snowflake> = Vec::with_capacity(users.len());
        for user in users {
            if notified.contains(&user.id) {
                continue;
            }
            notified.push(user.id);
            self.notify_user(user.id, pulse.author_id, NotificationType::Mention, |n| {
                n.with_pulse(pulse.id).with_content(&pulse.content_text)
            })
            .await;
        }
        debug!(count = notified.len(), "Mention notifications dispatched");
    }
}
