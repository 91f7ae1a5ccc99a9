//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (migrations are applied on startup)
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::Value;

/// Create a pulse and return its id
async fn create_pulse(server: &TestServer, user: &TestUser, request: &CreatePulseRequest) -> String {
    let response = server.post_auth("/pulse", &user.token, request).await.unwrap();
    let pulse: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    str_field(&pulse, "id").to_string()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_create_pulse_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/pulse", &CreatePulseRequest::unique())
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get_auth("/pulse/notifications", "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Feed & Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_new_pulse_leads_latest_feed_and_love_toggles() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();

    create_pulse(&server, &author, &CreatePulseRequest::text("First take")).await;
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::text("Second take")).await;

    let response = server
        .get(&format!("/pulse?filter=latest&userId={}", author.id))
        .await
        .unwrap();
    let feed: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(str_field(&feed[0], "id"), pulse_id);
    assert_eq!(feed[0]["userInfo"]["username"], author.username.as_str());

    // First toggle adds the reaction
    let response = server
        .post_auth(
            &format!("/pulse/{pulse_id}/reactions"),
            &author.token,
            &ReactionRequest::of("love"),
        )
        .await
        .unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["reactions"]["love"], 1);
    assert_eq!(toggled["reactions"]["total"], 1);
    assert_eq!(toggled["userReaction"], "love");

    // Second toggle removes it
    let response = server
        .post_auth(
            &format!("/pulse/{pulse_id}/reactions"),
            &author.token,
            &ReactionRequest::of("love"),
        )
        .await
        .unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["reactions"]["love"], 0);
    assert_eq!(toggled["reactions"]["total"], 0);
    assert!(toggled["userReaction"].is_null());
}

#[tokio::test]
async fn test_switching_reaction_keeps_total() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let fan = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;
    let path = format!("/pulse/{pulse_id}/reactions");

    server
        .post_auth(&path, &fan.token, &ReactionRequest::of("fire"))
        .await
        .unwrap();
    let response = server
        .post_auth(&path, &fan.token, &ReactionRequest::of("laugh"))
        .await
        .unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(toggled["reactions"]["fire"], 0);
    assert_eq!(toggled["reactions"]["laugh"], 1);
    assert_eq!(toggled["reactions"]["total"], 1);
    assert_eq!(toggled["userReaction"], "laugh");
}

#[tokio::test]
async fn test_unknown_reaction_type_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;

    let response = server
        .post_auth(
            &format!("/pulse/{pulse_id}/reactions"),
            &author.token,
            &ReactionRequest::of("meh"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_critic_rating_without_movie_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let critic = server.create_user().await.unwrap();

    let response = server
        .post_auth(
            "/pulse",
            &critic.token,
            &CreatePulseRequest::unlinked_critic_review(5),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    let message = body["error"]["message"].as_str().unwrap().to_lowercase();
    assert!(message.contains("linked movie"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_unknown_linked_movie_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user().await.unwrap();
    let request = CreatePulseRequest {
        content_text: "Can't wait".to_string(),
        linked_movie_id: Some(format!("missing-{}", unique_suffix())),
        ..Default::default()
    };

    let response = server.post_auth("/pulse", &user.token, &request).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_oversized_linked_content_id_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user().await.unwrap();

    let request = CreatePulseRequest::linked("show", &"s".repeat(100), "Severance");
    let response = server.post_auth("/pulse", &user.token, &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let request = CreatePulseRequest::linked("show", &"s".repeat(64), "Severance");
    let response = server.post_auth("/pulse", &user.token, &request).await.unwrap();
    let pulse: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(pulse["content"]["linkedContent"]["type"], "show");
}

#[tokio::test]
async fn test_blank_pulse_without_media_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user().await.unwrap();

    let response = server
        .post_auth("/pulse", &user.token, &CreatePulseRequest::text("   "))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    let message = body["error"]["message"].as_str().unwrap().to_lowercase();
    assert!(message.contains("empty"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_deleted_pulse_leaves_feed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let stranger = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;

    // Only the author may delete
    let response = server
        .delete_auth(&format!("/pulse/{pulse_id}"), &stranger.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth(&format!("/pulse/{pulse_id}"), &author.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    for filter in ["latest", "popular", "trending"] {
        let response = server
            .get(&format!("/pulse?filter={filter}&userId={}", author.id))
            .await
            .unwrap();
        let feed: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(feed.is_empty(), "{filter} feed still shows the pulse");
    }

    let response = server.get(&format!("/pulse/{pulse_id}")).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_invalid_feed_filter_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/pulse?filter=random").await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
}

// ============================================================================
// Engagement Tests
// ============================================================================

#[tokio::test]
async fn test_comment_notifies_author() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let commenter = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;

    let response = server
        .post_auth(
            &format!("/pulse/{pulse_id}/comments"),
            &commenter.token,
            &CreateCommentRequest::new("Agreed"),
        )
        .await
        .unwrap();
    let comment: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment["postId"], pulse_id.as_str());
    assert_eq!(comment["author"]["username"], commenter.username.as_str());

    let response = server
        .get(&format!("/pulse/{pulse_id}/comments"))
        .await
        .unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["pagination"]["total"], 1);

    let response = server
        .get_auth("/pulse/notifications", &author.token)
        .await
        .unwrap();
    let list: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list["notifications"][0]["type"], "comment");
    assert_eq!(list["unreadCount"], 1);
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;

    let response = server
        .post_auth(
            &format!("/pulse/{pulse_id}/comments"),
            &author.token,
            &CreateCommentRequest::new(""),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_bookmark_and_share() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.create_user().await.unwrap();
    let reader = server.create_user().await.unwrap();
    let pulse_id = create_pulse(&server, &author, &CreatePulseRequest::unique()).await;

    let response = server
        .post_auth_empty(&format!("/pulse/{pulse_id}/bookmark"), &reader.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["bookmarked"], true);

    let response = server
        .get_auth(&format!("/pulse/{pulse_id}"), &reader.token)
        .await
        .unwrap();
    let pulse: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pulse["engagement"]["hasBookmarked"], true);

    let response = server
        .delete_auth(&format!("/pulse/{pulse_id}/bookmark"), &reader.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["bookmarked"], false);

    for expected in 1..=2 {
        let response = server
            .post_auth_empty(&format!("/pulse/{pulse_id}/share"), &reader.token)
            .await
            .unwrap();
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(int_field(&body, "shares"), expected);
    }
}

// ============================================================================
// Follow & Stats Tests
// ============================================================================

#[tokio::test]
async fn test_follow_then_unfollow_updates_stats() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let a = server.create_user().await.unwrap();
    let b = server.create_user().await.unwrap();
    let follow_path = format!("/users/{}/follow", b.username);
    let stats_path = format!("/users/{}/stats", b.username);

    // Following twice yields one edge
    for _ in 0..2 {
        let response = server.post_auth_empty(&follow_path, &a.token).await.unwrap();
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body["following"], true);
    }

    let response = server.get(&stats_path).await.unwrap();
    let stats: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats["followers"], 1);

    let response = server.delete_auth(&follow_path, &a.token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["following"], false);

    let response = server.get(&stats_path).await.unwrap();
    let stats: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats["followers"], 0);

    // Unfollowing again is a no-op
    let response = server.delete_auth(&follow_path, &a.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_suggested_users_skip_self_and_followed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let viewer = server.create_user().await.unwrap();
    let followed = server.create_user().await.unwrap();
    let response = server
        .post_auth_empty(&format!("/users/{}/follow", followed.id), &viewer.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/users/suggested?limit=20", &viewer.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let suggested = body.as_array().unwrap();
    assert!(suggested.len() <= 20);
    for profile in suggested {
        let id = str_field(profile, "id");
        assert_ne!(id, viewer.id);
        assert_ne!(id, followed.id);
        assert_eq!(profile["isFollowing"], false);
        assert!(profile["username"].is_string());
    }

    // Anonymous callers get the default page size
    let response = server.get("/users/suggested").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.as_array().unwrap().len() <= 5);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user().await.unwrap();

    let response = server
        .post_auth_empty(&format!("/users/{}/follow", user.id), &user.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_follow_counts_in_daily_stats() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let a = server.create_user().await.unwrap();
    let b = server.create_user().await.unwrap();

    server
        .post_auth_empty(&format!("/users/{}/follow", b.id), &a.token)
        .await
        .unwrap();
    create_pulse(&server, &b, &CreatePulseRequest::unique()).await;

    let response = server
        .get_auth(&format!("/users/{}/stats/today", b.id), &b.token)
        .await
        .unwrap();
    let today: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(today["newFollowers"], 1);
    assert_eq!(today["pulsesPosted"], 1);

    let response = server
        .get_auth(&format!("/users/{}/stats/week", b.id), &b.token)
        .await
        .unwrap();
    let week: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(week["daily"].as_array().map(Vec::len), Some(1));
    assert_eq!(week["totals"]["newFollowers"], 1);
}

#[tokio::test]
async fn test_stats_range_rejects_reversed_dates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user().await.unwrap();

    let response = server
        .get_auth(
            &format!("/users/{}/stats/range?start=2024-03-10&end=2024-03-01", user.id),
            &user.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_notification_read_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let target = server.create_user().await.unwrap();

    for _ in 0..2 {
        let follower = server.create_user().await.unwrap();
        server
            .post_auth_empty(&format!("/users/{}/follow", target.id), &follower.token)
            .await
            .unwrap();
    }

    let response = server
        .get_auth("/pulse/notifications/unread-count", &target.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["unreadCount"], 2);

    let response = server
        .get_auth("/pulse/notifications", &target.token)
        .await
        .unwrap();
    let list: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let first_id = str_field(&list["notifications"][0], "id").to_string();

    let response = server
        .put_auth(&format!("/pulse/notifications/{first_id}/read"), &target.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post_auth_empty("/pulse/notifications/mark-all-read", &target.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["marked"], 1);

    let response = server
        .delete_auth(&format!("/pulse/notifications/{first_id}"), &target.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .delete_auth(&format!("/pulse/notifications/{first_id}"), &target.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Messaging Tests
// ============================================================================

#[tokio::test]
async fn test_direct_message_unread_count() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.create_user().await.unwrap();
    let bob = server.create_user().await.unwrap();

    let response = server
        .get_auth("/messages/unread-count", &alice.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["unreadCount"], 0);

    let response = server
        .post_auth(
            "/messages/conversations",
            &alice.token,
            &CreateConversationRequest::with(&[&bob]),
        )
        .await
        .unwrap();
    let conversation: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let conversation_id = str_field(&conversation, "id").to_string();
    let messages_path = format!("/messages/conversations/{conversation_id}/messages");

    // Same members reuse the conversation
    let response = server
        .post_auth(
            "/messages/conversations",
            &bob.token,
            &CreateConversationRequest::with(&[&alice]),
        )
        .await
        .unwrap();
    let again: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(str_field(&again, "id"), conversation_id);

    for text in ["Seen Dune yet?", "The sound design!"] {
        let response = server
            .post_auth(&messages_path, &bob.token, &SendMessageRequest::text(text))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }
    // Own messages never count as unread
    server
        .post_auth(&messages_path, &alice.token, &SendMessageRequest::text("Not yet"))
        .await
        .unwrap();

    let response = server
        .get_auth("/messages/unread-count", &alice.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["unreadCount"], 2);

    let response = server.get_auth(&messages_path, &alice.token).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["pagination"]["total"], 3);

    let response = server
        .put_auth(
            &format!("/messages/conversations/{conversation_id}/read"),
            &alice.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/messages/unread-count", &alice.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["unreadCount"], 0);
}

#[tokio::test]
async fn test_outsider_cannot_post_to_conversation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.create_user().await.unwrap();
    let bob = server.create_user().await.unwrap();
    let mallory = server.create_user().await.unwrap();

    let response = server
        .post_auth(
            "/messages/conversations",
            &alice.token,
            &CreateConversationRequest::with(&[&bob]),
        )
        .await
        .unwrap();
    let conversation: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let conversation_id = str_field(&conversation, "id");

    let response = server
        .post_auth(
            &format!("/messages/conversations/{conversation_id}/messages"),
            &mallory.token,
            &SendMessageRequest::text("hi"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_message_without_text_or_media_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.create_user().await.unwrap();
    let bob = server.create_user().await.unwrap();

    let response = server
        .post_auth(
            "/messages/conversations",
            &alice.token,
            &CreateConversationRequest::with(&[&bob]),
        )
        .await
        .unwrap();
    let conversation: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!(
        "/messages/conversations/{}/messages",
        str_field(&conversation, "id")
    );

    let response = server
        .post_auth(&path, &alice.token, &SendMessageRequest::text("   "))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let with_media = SendMessageRequest {
        content: String::new(),
        media_url: Some("https://cdn.example.com/still.jpg".to_string()),
    };
    let response = server.post_auth(&path, &alice.token, &with_media).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}
