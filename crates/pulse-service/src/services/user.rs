//! User service
//!
//! Profiles, public counters and the follow graph. Users are addressed by
//! ID or by username; either form resolves to the same account.

use pulse_core::{DomainError, NotificationType, Snowflake, StatCounter, User};
use tracing::{info, instrument};

use crate::dto::{FollowResponse, UserProfileResponse, UserStatsResponse};

use super::activity::ActivityService;
use super::context::ServiceContext;
use super::error::ServiceResult;

const DEFAULT_SUGGESTION_LIMIT: i64 = 5;
const MAX_SUGGESTION_LIMIT: i64 = 20;

fn suggestion_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
        .clamp(1, MAX_SUGGESTION_LIMIT)
}

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Look a user up by ID, falling back to username
    #[instrument(skip(self))]
    pub async fn resolve(&self, ident: &str) -> ServiceResult<User> {
        if let Ok(id) = ident.parse::<Snowflake>() {
            if let Some(user) = self.ctx.user_repo().find_by_id(id).await? {
                return Ok(user);
            }
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_username(ident)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(ident.to_string()))?;
        Ok(user)
    }

    /// Profile with counters and, for a signed-in viewer, follow state
    #[instrument(skip(self))]
    pub async fn get_profile(
        &self,
        ident: &str,
        viewer_id: Option<Snowflake>,
    ) -> ServiceResult<UserProfileResponse> {
        let user = self.resolve(ident).await?;

        let is_following = match viewer_id {
            Some(viewer) if viewer != user.id => {
                Some(self.ctx.follow_repo().is_following(viewer, user.id).await?)
            }
            Some(_) => Some(false),
            None => None,
        };

        self.profile(user, is_following).await
    }

    /// Accounts the viewer does not follow yet
    #[instrument(skip(self))]
    pub async fn suggested(
        &self,
        viewer_id: Option<Snowflake>,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<UserProfileResponse>> {
        let users = self
            .ctx
            .follow_repo()
            .suggestions(viewer_id, suggestion_limit(limit))
            .await?;

        let is_following = viewer_id.map(|_| false);
        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            profiles.push(self.profile(user, is_following).await?);
        }
        Ok(profiles)
    }

    async fn profile(
        &self,
        user: User,
        is_following: Option<bool>,
    ) -> ServiceResult<UserProfileResponse> {
        let stats = self.counters(user.id).await?;

        Ok(UserProfileResponse {
            id: user.id.to_string(),
            display_name: user.display_name().to_string(),
            username: user.username,
            avatar_url: user.avatar_url,
            profile_visibility: user.visibility.as_str().to_string(),
            followers: stats.followers,
            following: stats.following,
            pulses: stats.pulses,
            is_following,
            created_at: user.created_at,
        })
    }

    /// Follower, following and pulse counts
    #[instrument(skip(self))]
    pub async fn get_stats(&self, ident: &str) -> ServiceResult<UserStatsResponse> {
        let user = self.resolve(ident).await?;
        self.counters(user.id).await
    }

    /// Follow a user; following twice is a no-op
    #[instrument(skip(self))]
    pub async fn follow(&self, follower_id: Snowflake, ident: &str) -> ServiceResult<FollowResponse> {
        let target = self.resolve(ident).await?;
        if target.id == follower_id {
            return Err(DomainError::CannotFollowSelf.into());
        }

        let created = self.ctx.follow_repo().follow(follower_id, target.id).await?;

        if created {
            info!(follower_id = %follower_id, following_id = %target.id, "User followed");

            let activity = ActivityService::new(self.ctx);
            activity
                .notify_user(target.id, follower_id, NotificationType::Follow, |n| n)
                .await;
            activity.bump(target.id, StatCounter::NewFollowers).await;
        }

        Ok(FollowResponse { following: true })
    }

    /// Unfollow a user; unfollowing twice is a no-op
    #[instrument(skip(self))]
    pub async fn unfollow(
        &self,
        follower_id: Snowflake,
        ident: &str,
    ) -> ServiceResult<FollowResponse> {
        let target = self.resolve(ident).await?;

        if self.ctx.follow_repo().unfollow(follower_id, target.id).await? {
            info!(follower_id = %follower_id, following_id = %target.id, "User unfollowed");
        }

        Ok(FollowResponse { following: false })
    }

    async fn counters(&self, user_id: Snowflake) -> ServiceResult<UserStatsResponse> {
        let followers = self.ctx.follow_repo().follower_count(user_id).await?;
        let following = self.ctx.follow_repo().following_count(user_id).await?;
        let pulses = self.ctx.pulse_repo().count_by_author(user_id).await?;

        Ok(UserStatsResponse {
            followers,
            following,
            pulses,
        })
    }
}
