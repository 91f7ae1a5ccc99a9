//! Messaging model -> entity mappers

use pulse_core::entities::{Conversation, DirectMessage, Participant};
use pulse_core::value_objects::Snowflake;

use crate::models::{ConversationModel, DirectMessageModel, ParticipantModel};

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: Snowflake::new(model.id),
            created_at: model.created_at,
            last_message_at: model.last_message_at,
        }
    }
}

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            conversation_id: Snowflake::new(model.conversation_id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
            last_read_at: model.last_read_at,
        }
    }
}

impl From<DirectMessageModel> for DirectMessage {
    fn from(model: DirectMessageModel) -> Self {
        DirectMessage {
            id: Snowflake::new(model.id),
            conversation_id: Snowflake::new(model.conversation_id),
            sender_id: Snowflake::new(model.sender_id),
            content: model.content,
            media_url: model.media_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
