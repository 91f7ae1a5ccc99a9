//! Messaging service
//!
//! Direct conversations between two or more users. A conversation is
//! identified by its exact participant set, so asking for the same set twice
//! returns the existing conversation.

use std::collections::HashMap;

use chrono::Utc;
use pulse_core::entities::{normalize_message, normalize_participants};
use pulse_core::{
    Conversation, ConversationSummary, DirectMessage, DomainError, PageRequest, Participant,
    Snowflake, User,
};
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    ConversationResponse, CreateConversationRequest, MessageResponse, MessageWithSender,
    PaginatedResponse, SendMessageRequest, UnreadCountResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Default page size for message history
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Default page size for the conversation list
pub const DEFAULT_CONVERSATION_LIMIT: i64 = 20;

fn parse_participant_ids(raw_ids: &[String]) -> ServiceResult<Vec<Snowflake>> {
    raw_ids
        .iter()
        .map(|raw| {
            raw.trim()
                .parse::<Snowflake>()
                .map_err(|_| ServiceError::validation(format!("Invalid participant ID: {raw}")))
        })
        .collect()
}

/// Messaging service
pub struct MessagingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessagingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a conversation, or return the one with the same participants
    #[instrument(skip(self, request))]
    pub async fn create_conversation(
        &self,
        creator_id: Snowflake,
        request: CreateConversationRequest,
    ) -> ServiceResult<ConversationResponse> {
        let requested = parse_participant_ids(&request.participant_ids)?;
        let ids = normalize_participants(creator_id, &requested)?;

        let users = self.ctx.user_repo().find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !users.iter().any(|u| u.id == **id)) {
            return Err(DomainError::UserNotFound(missing.to_string()).into());
        }

        if let Some(existing) = self
            .ctx
            .conversation_repo()
            .find_by_exact_participants(&ids)
            .await?
        {
            debug!(conversation_id = %existing.id, "Reusing existing conversation");
            return self.summarize(existing, creator_id).await.map(Into::into);
        }

        let conversation = Conversation {
            id: self.ctx.generate_id(),
            created_at: Utc::now(),
            last_message_at: None,
        };
        self.ctx
            .conversation_repo()
            .create(&conversation, &ids)
            .await?;

        info!(
            conversation_id = %conversation.id,
            participants = ids.len(),
            "Conversation created"
        );

        Ok(ConversationResponse::from(ConversationSummary {
            conversation,
            participants: users,
            last_message: None,
            unread_count: 0,
        }))
    }

    /// The caller's conversations, most recently active first
    #[instrument(skip(self))]
    pub async fn list_conversations(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<ConversationResponse>> {
        let conversations = self
            .ctx
            .conversation_repo()
            .list_for_user(user_id, page)
            .await?;
        let total = self.ctx.conversation_repo().count_for_user(user_id).await?;

        let mut data = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            data.push(ConversationResponse::from(
                self.summarize(conversation, user_id).await?,
            ));
        }

        Ok(PaginatedResponse::new(data, page.page, page.limit, total))
    }

    /// One conversation; hidden from non-participants
    #[instrument(skip(self))]
    pub async fn get_conversation(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<ConversationResponse> {
        let conversation = self.find_conversation(conversation_id).await?;
        self.ctx
            .conversation_repo()
            .find_participant(conversation_id, user_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;

        Ok(self.summarize(conversation, user_id).await?.into())
    }

    /// Send a message; the sender must be a participant
    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        sender_id: Snowflake,
        conversation_id: Snowflake,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        self.find_conversation(conversation_id).await?;
        self.require_participant(conversation_id, sender_id).await?;

        let media_url = request
            .media_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let content = normalize_message(&request.content, media_url.is_some())?;

        let sender = self
            .ctx
            .user_repo()
            .find_by_id(sender_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(sender_id.to_string()))?;

        let message = DirectMessage::new(
            self.ctx.generate_id(),
            conversation_id,
            sender_id,
            content,
            media_url,
        );
        self.ctx.message_repo().create(&message).await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            "Direct message sent"
        );

        Ok(MessageResponse::from(MessageWithSender {
            message,
            sender,
            is_read: true,
        }))
    }

    /// Message history, counted from the most recent end and returned oldest first
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<MessageResponse>> {
        self.find_conversation(conversation_id).await?;
        let participant = self.require_participant(conversation_id, user_id).await?;

        let messages = self
            .ctx
            .message_repo()
            .find_page(conversation_id, page)
            .await?;
        let total = self.ctx.message_repo().count_in(conversation_id).await?;

        let mut sender_ids: Vec<Snowflake> = messages.iter().map(|m| m.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();
        let senders = self.users_by_id(&sender_ids).await?;

        let data = messages
            .into_iter()
            .filter_map(|message| {
                let Some(sender) = senders.get(&message.sender_id) else {
                    warn!(message_id = %message.id, "Message sender missing");
                    return None;
                };
                let is_read = message.is_read_by(user_id, participant.last_read_at);
                Some(MessageResponse::from(MessageWithSender {
                    sender: sender.clone(),
                    message,
                    is_read,
                }))
            })
            .collect();

        Ok(PaginatedResponse::new(data, page.page, page.limit, total))
    }

    /// Move the caller's read marker to now
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Snowflake, conversation_id: Snowflake) -> ServiceResult<()> {
        self.find_conversation(conversation_id).await?;
        self.ctx
            .conversation_repo()
            .mark_read(conversation_id, user_id)
            .await?;
        Ok(())
    }

    /// Unread messages across all of the caller's conversations
    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<UnreadCountResponse> {
        let unread_count = self.ctx.message_repo().unread_count_for_user(user_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    /// Delete a message; only its sender may do this
    #[instrument(skip(self))]
    pub async fn delete_message(&self, user_id: Snowflake, message_id: Snowflake) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }

        self.ctx.message_repo().delete(message_id).await?;
        info!(message_id = %message_id, "Direct message deleted");
        Ok(())
    }

    /// Leave a conversation; the last one out deletes it
    #[instrument(skip(self))]
    pub async fn delete_conversation(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<()> {
        self.find_conversation(conversation_id).await?;

        let deleted = match self
            .ctx
            .conversation_repo()
            .remove_participant(conversation_id, user_id)
            .await
        {
            Ok(deleted) => deleted,
            Err(DomainError::NotParticipant) => {
                return Err(DomainError::ConversationNotFound(conversation_id).into())
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            conversation_id = %conversation_id,
            user_id = %user_id,
            deleted,
            "Left conversation"
        );
        Ok(())
    }

    async fn find_conversation(&self, conversation_id: Snowflake) -> ServiceResult<Conversation> {
        let conversation = self
            .ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;
        Ok(conversation)
    }

    async fn require_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Participant> {
        let participant = self
            .ctx
            .conversation_repo()
            .find_participant(conversation_id, user_id)
            .await?
            .ok_or(DomainError::NotParticipant)?;
        Ok(participant)
    }

    async fn users_by_id(&self, ids: &[Snowflake]) -> ServiceResult<HashMap<Snowflake, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self
            .ctx
            .user_repo()
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    /// Participants, last message and the viewer's unread count
    async fn summarize(
        &self,
        conversation: Conversation,
        viewer_id: Snowflake,
    ) -> ServiceResult<ConversationSummary> {
        let member_ids: Vec<Snowflake> = self
            .ctx
            .conversation_repo()
            .list_participants(conversation.id)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        let mut users = self.users_by_id(&member_ids).await?;
        let participants = member_ids
            .iter()
            .filter_map(|id| users.remove(id))
            .collect();

        let last_message = self.ctx.message_repo().latest_in(conversation.id).await?;
        let unread_count = self
            .ctx
            .message_repo()
            .unread_count_in(conversation.id, viewer_id)
            .await?;

        Ok(ConversationSummary {
            conversation,
            participants,
            last_message,
            unread_count,
        })
    }
}
