//! Pulse service
//!
//! Feed reads, trending topics, and pulse creation/deletion.

use std::collections::HashMap;

use chrono::Utc;
use pulse_core::entities::normalize_hashtag_filter;
use pulse_core::{
    infer_topic_category, DomainError, FeedPulse, FeedQuery, LinkedContent, PageRequest,
    Pulse, PulseDraft, ReactionType, Snowflake, StatCounter,
};
use tracing::{debug, info, instrument};

use crate::dto::{
    CreatePulseRequest, FeedParams, PulseResponse, PulseWithReaction, TrendingParams,
    TrendingTopicResponse,
};

use super::activity::ActivityService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Default number of trending topics
const DEFAULT_TRENDING_LIMIT: i64 = 10;

/// Upper bound on trending topics per request
const MAX_TRENDING_LIMIT: i64 = 50;

fn trending_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_TRENDING_LIMIT)
        .clamp(1, MAX_TRENDING_LIMIT)
}

/// Pulse service
pub struct PulseService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PulseService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One page of the feed
    ///
    /// The viewer only ever comes from the bearer token; a `following`
    /// feed without one is empty.
    #[instrument(skip(self, params))]
    pub async fn list_feed(
        &self,
        params: FeedParams,
        viewer_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<PulseResponse>> {
        let author_id = params
            .user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|raw| {
                raw.parse::<Snowflake>()
                    .map_err(|_| ServiceError::validation(format!("Invalid userId: {raw}")))
            })
            .transpose()?;

        let query = FeedQuery {
            filter: params.filter.unwrap_or_default(),
            window: params.window.unwrap_or_default(),
            page: PageRequest::new(params.page, params.limit),
            viewer_id,
            hashtag: params.hashtag.as_deref().and_then(normalize_hashtag_filter),
            movie_external_id: params.movie_id.filter(|s| !s.is_empty()),
            linked_type: params.linked_type.filter(|s| !s.is_empty()),
            author_id,
        };

        if query.is_trivially_empty() {
            debug!("Following feed requested without a viewer");
            return Ok(Vec::new());
        }

        let pulses = self.ctx.pulse_repo().list_feed(&query).await?;
        debug!(count = pulses.len(), filter = query.filter.as_str(), "Feed page loaded");

        self.annotate(pulses, viewer_id).await
    }

    /// Most used hashtags in the window, ranked from 1
    #[instrument(skip(self))]
    pub async fn trending_topics(
        &self,
        params: TrendingParams,
    ) -> ServiceResult<Vec<TrendingTopicResponse>> {
        let limit = trending_limit(params.limit);
        let since = params.window.unwrap_or_default().since(Utc::now());

        let tags = self.ctx.pulse_repo().trending_tags(since, limit).await?;

        Ok(tags
            .into_iter()
            .enumerate()
            .map(|(i, (tag, count))| TrendingTopicResponse {
                id: i + 1,
                category: infer_topic_category(&tag),
                tag,
                count,
            })
            .collect())
    }

    /// Single pulse, if the viewer may see it
    #[instrument(skip(self))]
    pub async fn get_pulse(
        &self,
        pulse_id: Snowflake,
        viewer_id: Option<Snowflake>,
    ) -> ServiceResult<PulseResponse> {
        let pulse = self
            .ctx
            .pulse_repo()
            .find_visible(pulse_id, viewer_id)
            .await?
            .ok_or(DomainError::PulseNotFound(pulse_id))?;

        let has_bookmarked = match viewer_id {
            Some(viewer) => self.ctx.bookmark_repo().exists(viewer, pulse_id).await?,
            None => false,
        };
        let user_reaction = match viewer_id {
            Some(viewer) => self
                .ctx
                .reaction_repo()
                .find_for_user(viewer, &[pulse_id])
                .await?
                .remove(&pulse_id),
            None => None,
        };

        Ok(PulseResponse::from(PulseWithReaction {
            pulse,
            user_reaction,
            has_bookmarked,
        }))
    }

    /// Create a pulse
    #[instrument(skip(self, request))]
    pub async fn create_pulse(
        &self,
        author_id: Snowflake,
        request: CreatePulseRequest,
    ) -> ServiceResult<PulseResponse> {
        let author = self
            .ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(author_id.to_string()))?;

        let draft = PulseDraft {
            author_id,
            content_text: request.content_text,
            media: request.content_media.unwrap_or_default(),
            linked_movie_id: request.linked_movie_id.filter(|id| !id.trim().is_empty()),
            linked_content: request.linked_content.map(|lc| LinkedContent {
                kind: lc.kind,
                id: lc.id,
                title: lc.title,
                poster_url: lc.poster_url,
            }),
            hashtags: request.hashtags.unwrap_or_default(),
            posted_as_role: request.posted_as_role,
            star_rating: request.star_rating,
        };
        let role = draft.validate()?;

        let movie = match draft.linked_movie_id.as_deref() {
            Some(external_id) => Some(
                self.ctx
                    .movie_repo()
                    .find_by_external_id(external_id)
                    .await?
                    .ok_or_else(|| DomainError::MovieNotFound(external_id.to_string()))?,
            ),
            None => None,
        };

        let pulse = Pulse::from_draft(self.ctx.generate_id(), draft, role, movie.as_ref());
        self.ctx.pulse_repo().create(&pulse).await?;

        info!(pulse_id = %pulse.id, author_id = %author_id, "Pulse created");

        let activity = ActivityService::new(self.ctx);
        activity.bump(author_id, StatCounter::PulsesPosted).await;
        activity.notify_mentions(&pulse).await;

        Ok(PulseResponse::from(PulseWithReaction {
            pulse: FeedPulse { pulse, author },
            user_reaction: None,
            has_bookmarked: false,
        }))
    }

    /// Soft-delete a pulse; only its author may do this
    #[instrument(skip(self))]
    pub async fn delete_pulse(&self, user_id: Snowflake, pulse_id: Snowflake) -> ServiceResult<()> {
        let pulse = self
            .ctx
            .pulse_repo()
            .find_active(pulse_id)
            .await?
            .ok_or(DomainError::PulseNotFound(pulse_id))?;

        if !pulse.is_authored_by(user_id) {
            return Err(DomainError::NotPulseAuthor.into());
        }

        if !self.ctx.pulse_repo().soft_delete(pulse_id).await? {
            return Err(DomainError::PulseNotFound(pulse_id).into());
        }

        info!(pulse_id = %pulse_id, "Pulse deleted");
        Ok(())
    }

    /// Attach the viewer's reactions to a feed page in one lookup
    async fn annotate(
        &self,
        pulses: Vec<FeedPulse>,
        viewer_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<PulseResponse>> {
        let mut reactions: HashMap<Snowflake, ReactionType> = HashMap::new();
        if let Some(viewer) = viewer_id {
            if !pulses.is_empty() {
                let ids: Vec<Snowflake> = pulses.iter().map(|p| p.pulse.id).collect();
                reactions = self.ctx.reaction_repo().find_for_user(viewer, &ids).await?;
            }
        }

        Ok(pulses
            .into_iter()
            .map(|pulse| {
                let user_reaction = reactions.get(&pulse.pulse.id).copied();
                PulseResponse::from(PulseWithReaction {
                    pulse,
                    user_reaction,
                    has_bookmarked: false,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_limit_bounds() {
        assert_eq!(trending_limit(None), 10);
        assert_eq!(trending_limit(Some(0)), 1);
        assert_eq!(trending_limit(Some(25)), 25);
        assert_eq!(trending_limit(Some(500)), 50);
    }
}
