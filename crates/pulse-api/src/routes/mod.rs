//! Route definitions
//!
//! All API routes are organized by domain and mounted under /api/v1. Static
//! segments such as `/pulse/feed` take priority over `/pulse/:id`.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{engagement, health, messages, notifications, pulses, stats, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, kept outside rate limiting
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(pulse_routes())
        .merge(notification_routes())
        .merge(user_routes())
        .merge(message_routes())
}

/// Feed, pulses and engagement
fn pulse_routes() -> Router<AppState> {
    Router::new()
        .route("/pulse", get(pulses::list_feed).post(pulses::create_pulse))
        .route("/pulse/feed", get(pulses::list_feed))
        .route("/pulse/trending-topics", get(pulses::trending_topics))
        .route(
            "/pulse/:id",
            get(pulses::get_pulse).delete(pulses::delete_pulse),
        )
        .route("/pulse/:id/reactions", post(engagement::toggle_reaction))
        .route(
            "/pulse/:id/comments",
            get(engagement::list_comments).post(engagement::add_comment),
        )
        .route(
            "/pulse/:id/comments/:comment_id",
            delete(engagement::delete_comment),
        )
        .route(
            "/pulse/:id/bookmark",
            post(engagement::bookmark).delete(engagement::unbookmark),
        )
        .route("/pulse/:id/share", post(engagement::share))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/pulse/notifications", get(notifications::list_notifications))
        .route(
            "/pulse/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/pulse/notifications/mark-all-read",
            post(notifications::mark_all_read),
        )
        .route("/pulse/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/pulse/notifications/:id",
            delete(notifications::delete_notification),
        )
}

/// Profiles, follows and daily stats
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/suggested", get(users::suggested))
        .route("/users/:user", get(users::get_profile))
        .route("/users/:user/stats", get(users::get_stats))
        .route(
            "/users/:user/follow",
            post(users::follow).delete(users::unfollow),
        )
        .route("/users/:user/stats/today", get(stats::today))
        .route("/users/:user/stats/week", get(stats::week))
        .route("/users/:user/stats/month", get(stats::month))
        .route("/users/:user/stats/range", get(stats::range))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages/conversations",
            get(messages::list_conversations).post(messages::create_conversation),
        )
        .route(
            "/messages/conversations/:id",
            get(messages::get_conversation).delete(messages::delete_conversation),
        )
        .route(
            "/messages/conversations/:id/messages",
            get(messages::get_messages).post(messages::send_message),
        )
        .route("/messages/conversations/:id/read", put(messages::mark_read))
        .route("/messages/messages/:id", delete(messages::delete_message))
        .route("/messages/unread-count", get(messages::unread_count))
}
