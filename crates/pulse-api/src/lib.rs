//! # pulse-api
//!
//! REST API server for the movie-social pulse backend, built with Axum.
//!
//! Every route lives under `/api/v1` except the `/health` probes. Handlers
//! stay thin: they extract the caller and input, then delegate to a
//! `pulse-service` service.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
