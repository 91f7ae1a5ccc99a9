//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, query strings and paths.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{IdPairPath, IdPath};
pub use query::QueryParams;
pub use validated::ValidatedJson;
