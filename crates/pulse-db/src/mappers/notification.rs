//! Notification and stats model -> entity mappers

use pulse_core::entities::{
    DailyStat, Notification, NotificationEntry, NotificationType, ProfileVisibility, User,
};
use pulse_core::value_objects::Snowflake;

use crate::models::{DailyStatModel, NotificationEntryModel};

impl From<NotificationEntryModel> for NotificationEntry {
    fn from(model: NotificationEntryModel) -> Self {
        let actor = User {
            id: Snowflake::new(model.actor_id),
            username: model.actor_username,
            display_name: model.actor_display_name,
            avatar_url: model.actor_avatar_url,
            visibility: ProfileVisibility::Public,
            created_at: model.actor_created_at,
        };
        let notification = Notification {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            actor_id: actor.id,
            // the column is CHECK-constrained to the known types
            kind: model.kind.parse().unwrap_or(NotificationType::Reaction),
            pulse_id: model.pulse_id.map(Snowflake::new),
            comment_id: model.comment_id.map(Snowflake::new),
            content: model.content,
            is_read: model.is_read,
            created_at: model.created_at,
        };
        NotificationEntry {
            notification,
            actor,
            pulse_preview: model.pulse_preview,
            comment_preview: model.comment_preview,
        }
    }
}

impl From<DailyStatModel> for DailyStat {
    fn from(model: DailyStatModel) -> Self {
        DailyStat {
            user_id: Snowflake::new(model.user_id),
            stat_date: model.stat_date,
            pulses_posted: model.pulses_posted,
            likes_received: model.likes_received,
            new_followers: model.new_followers,
            comments_received: model.comments_received,
        }
    }
}
