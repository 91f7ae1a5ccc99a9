//! Authentication extractor
//!
//! Extracts and validates bearer tokens from the Authorization header.
//! Tokens are minted by the auth service; here they are only verified.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use pulse_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }

    fn from_token(state: &AppState, token: &str) -> Result<Self, ApiError> {
        let claims = state
            .jwt_service()
            .validate_access_token(token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::App(e)
            })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in token");
            ApiError::App(e)
        })?;

        Ok(Self::new(user_id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        Self::from_token(&app_state, bearer.token())
    }
}

/// Optional authenticated user
///
/// `None` when no Authorization header is present. A header carrying a bad
/// token is still rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    /// Viewer ID, if signed in
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.map(|auth| auth.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                AuthUser::from_token(&app_state, bearer.token()).map(|auth| Self(Some(auth)))
            }
            Err(_) => Ok(Self(None)),
        }
    }
}
