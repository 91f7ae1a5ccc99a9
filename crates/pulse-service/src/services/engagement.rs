//! Engagement service
//!
//! Reactions, comments, bookmarks and shares on a pulse. Every operation
//! first resolves the pulse as the caller sees it, so a pulse hidden by a
//! private profile behaves exactly like a missing one.

use std::collections::HashMap;

use pulse_core::entities::normalize_comment;
use pulse_core::{
    Comment, DomainError, FeedPulse, NotificationType, PageRequest, ReactionType, Snowflake,
    StatCounter, User,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    BookmarkResponse, CommentResponse, CommentWithAuthor, CreateCommentRequest,
    PaginatedResponse, ReactionRequest, ReactionToggleResponse, ShareResponse,
};

use super::activity::ActivityService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Engagement service
pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add, switch or remove the caller's reaction
    #[instrument(skip(self, request))]
    pub async fn toggle_reaction(
        &self,
        user_id: Snowflake,
        pulse_id: Snowflake,
        request: ReactionRequest,
    ) -> ServiceResult<ReactionToggleResponse> {
        let kind: ReactionType = request.kind.parse()?;
        let target = self.visible_pulse(pulse_id, user_id).await?;

        let toggle = self
            .ctx
            .reaction_repo()
            .toggle(pulse_id, user_id, kind)
            .await?;

        info!(
            pulse_id = %pulse_id,
            user_id = %user_id,
            outcome = ?toggle.outcome,
            "Reaction toggled"
        );

        if toggle.is_new_reaction() {
            let author_id = target.pulse.author_id;
            let activity = ActivityService::new(self.ctx);
            activity
                .notify_user(author_id, user_id, NotificationType::Reaction, |n| {
                    n.with_pulse(pulse_id).with_content(kind.as_str())
                })
                .await;
            activity
                .bump_received(author_id, user_id, StatCounter::LikesReceived)
                .await;
        }

        Ok(ReactionToggleResponse::from(&toggle))
    }

    /// Comment on a pulse
    #[instrument(skip(self, request))]
    pub async fn add_comment(
        &self,
        user_id: Snowflake,
        pulse_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let content = normalize_comment(&request.content)?;
        let target = self.visible_pulse(pulse_id, user_id).await?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;

        let comment = Comment::new(self.ctx.generate_id(), pulse_id, user_id, content);
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, pulse_id = %pulse_id, "Comment added");

        let owner_id = target.pulse.author_id;
        let activity = ActivityService::new(self.ctx);
        activity
            .notify_user(owner_id, user_id, NotificationType::Comment, |n| {
                n.with_pulse(pulse_id)
                    .with_comment(comment.id)
                    .with_content(&comment.content)
            })
            .await;
        activity
            .bump_received(owner_id, user_id, StatCounter::CommentsReceived)
            .await;

        Ok(CommentResponse::from(CommentWithAuthor { comment, author }))
    }

    /// Comments on a pulse, newest first
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        pulse_id: Snowflake,
        viewer_id: Option<Snowflake>,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<CommentResponse>> {
        self.ctx
            .pulse_repo()
            .find_visible(pulse_id, viewer_id)
            .await?
            .ok_or(DomainError::PulseNotFound(pulse_id))?;

        let comments = self.ctx.comment_repo().list_by_pulse(pulse_id, page).await?;
        let total = self.ctx.comment_repo().count_by_pulse(pulse_id).await?;

        let mut author_ids: Vec<Snowflake> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Snowflake, User> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.ctx
                .user_repo()
                .find_by_ids(&author_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        let data = comments
            .into_iter()
            .filter_map(|comment| match authors.get(&comment.author_id) {
                Some(author) => Some(CommentResponse::from(CommentWithAuthor {
                    author: author.clone(),
                    comment,
                })),
                None => {
                    warn!(comment_id = %comment.id, "Comment author missing");
                    None
                }
            })
            .collect();

        Ok(PaginatedResponse::new(data, page.page, page.limit, total))
    }

    /// Delete a comment; only its author may do this
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        user_id: Snowflake,
        pulse_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.belongs_to(pulse_id))
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_authored_by(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.ctx.comment_repo().delete(&comment).await?;

        info!(comment_id = %comment_id, pulse_id = %pulse_id, "Comment deleted");
        Ok(())
    }

    /// Bookmark a pulse; repeating is harmless
    #[instrument(skip(self))]
    pub async fn bookmark(
        &self,
        user_id: Snowflake,
        pulse_id: Snowflake,
    ) -> ServiceResult<BookmarkResponse> {
        self.visible_pulse(pulse_id, user_id).await?;
        self.ctx.bookmark_repo().add(user_id, pulse_id).await?;
        Ok(BookmarkResponse { bookmarked: true })
    }

    /// Remove a bookmark; removing a missing one is harmless
    #[instrument(skip(self))]
    pub async fn unbookmark(
        &self,
        user_id: Snowflake,
        pulse_id: Snowflake,
    ) -> ServiceResult<BookmarkResponse> {
        self.ctx
            .pulse_repo()
            .find_active(pulse_id)
            .await?
            .ok_or(DomainError::PulseNotFound(pulse_id))?;
        self.ctx.bookmark_repo().remove(user_id, pulse_id).await?;
        Ok(BookmarkResponse { bookmarked: false })
    }

    /// Count a share and tell the author
    #[instrument(skip(self))]
    pub async fn share(&self, user_id: Snowflake, pulse_id: Snowflake) -> ServiceResult<ShareResponse> {
        let target = self.visible_pulse(pulse_id, user_id).await?;
        let shares = self.ctx.pulse_repo().increment_shares(pulse_id).await?;

        info!(pulse_id = %pulse_id, shares, "Pulse shared");

        ActivityService::new(self.ctx)
            .notify_user(
                target.pulse.author_id,
                user_id,
                NotificationType::Share,
                |n| n.with_pulse(pulse_id),
            )
            .await;

        Ok(ShareResponse { shares })
    }

    async fn visible_pulse(&self, pulse_id: Snowflake, user_id: Snowflake) -> ServiceResult<FeedPulse> {
        let pulse = self
            .ctx
            .pulse_repo()
            .find_visible(pulse_id, Some(user_id))
            .await?
            .ok_or(DomainError::PulseNotFound(pulse_id))?;
        Ok(pulse)
    }
}
