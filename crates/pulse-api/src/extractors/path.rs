//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use pulse_core::Snowflake;

use crate::response::ApiError;

fn parse_id(raw: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid ID: {raw}")))
}

/// A single Snowflake path parameter, e.g. `/pulse/:id`
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        parse_id(&raw).map(IdPath)
    }
}

/// Two Snowflake path parameters, e.g. `/pulse/:id/comments/:comment_id`
#[derive(Debug, Clone, Copy)]
pub struct IdPairPath(pub Snowflake, pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPairPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(IdPairPath(parse_id(&first)?, parse_id(&second)?))
    }
}
