mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

// Session claims carry second-granularity timestamps; spacing issuances
// guarantees the newly signed token differs from the previous one.
async fn next_second() {
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
}

#[tokio::test]
async fn second_login_invalidates_first_session() -> Result<()> {
    let app = common::test_app();
    let (first_access, _) = app.signup("a@b.com").await;

    next_second().await;
    let (status, _) = app.login("a@b.com", "longenough1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get_authed("/auth/validate-token", &first_access).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "TOKEN_REVOKED");
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_session() -> Result<()> {
    let app = common::test_app();
    let (access, _) = app.signup("a@b.com").await;

    let (status, body) = app.post_authed("/auth/logout", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, body) = app.get_authed("/auth/validate-token", &access).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "TOKEN_REVOKED");
    Ok(())
}

#[tokio::test]
async fn refresh_swaps_the_session_token_and_keeps_the_refresh_token() -> Result<()> {
    let app = common::test_app();
    let (old_access, refresh) = app.signup("a@b.com").await;

    next_second().await;
    let (status, body) = app
        .post_json("/auth/refresh-token", json!({ "refreshToken": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token refreshed successfully");
    let new_access = body["accessToken"].as_str().unwrap().to_string();
    assert_ne!(new_access, old_access);

    // The rotated token is live; the replaced one is revoked.
    let (status, _) = app.get_authed("/auth/validate-token", &new_access).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get_authed("/auth/validate-token", &old_access).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "TOKEN_REVOKED");

    // The same refresh token keeps working until its own expiry.
    let (status, _) = app
        .post_json("/auth/refresh-token", json!({ "refreshToken": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refresh_with_superseded_token_requires_re_login() -> Result<()> {
    let app = common::test_app();
    let (_, first_refresh) = app.signup("a@b.com").await;

    // A newer login overwrites the record.
    let (status, _) = app.login("a@b.com", "longenough1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post_json("/auth/refresh-token", json!({ "refreshToken": first_refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid refresh token");
    assert_eq!(body["details"], "Please log in again");
    Ok(())
}

#[tokio::test]
async fn refresh_with_garbage_token_requires_re_login() -> Result<()> {
    let app = common::test_app();

    let (status, body) = app
        .post_json("/auth/refresh-token", json!({ "refreshToken": "not-a-jwt" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid refresh token");
    Ok(())
}

#[tokio::test]
async fn refresh_without_token_is_a_validation_error() -> Result<()> {
    let app = common::test_app();

    let (status, body) = app.post_json("/auth/refresh-token", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing refresh token");
    Ok(())
}

#[tokio::test]
async fn refresh_does_not_re_open_the_fresh_auth_window() -> Result<()> {
    let app = common::test_app();
    let (_, refresh) = app.signup("a@b.com").await;
    let account_id = app.tokens.account_id_for_slot().unwrap();

    app.tokens.backdate(account_id, Duration::minutes(16));

    let (status, body) = app
        .post_json("/auth/refresh-token", json!({ "refreshToken": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["accessToken"].as_str().unwrap().to_string();

    // Still stale: rotation must not reset created_at.
    let (status, body) = app.post_authed("/auth/change-password", &rotated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "FRESH_AUTH_REQUIRED");
    Ok(())
}

#[tokio::test]
async fn fresh_auth_window_accepts_recent_sessions_only() -> Result<()> {
    let app = common::test_app();
    let (access, _) = app.signup("a@b.com").await;
    let account_id = app.tokens.account_id_for_slot().unwrap();

    app.tokens.backdate(account_id, Duration::minutes(10));
    let (status, _) = app.post_authed("/auth/change-password", &access).await;
    assert_eq!(status, StatusCode::OK);

    app.tokens.backdate(account_id, Duration::minutes(16));
    let (status, body) = app.post_authed("/auth/change-password", &access).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "FRESH_AUTH_REQUIRED");
    Ok(())
}

#[tokio::test]
async fn profile_reflects_the_authenticated_account() -> Result<()> {
    let app = common::test_app();
    let (access, _) = app.signup("a@b.com").await;

    let (status, body) = app.get_authed("/auth/profile", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@b.com");
    assert_eq!(body["user"]["organization"], "Initech");
    Ok(())
}

#[tokio::test]
async fn guard_touches_last_used_on_success() -> Result<()> {
    let app = common::test_app();
    let (access, _) = app.signup("a@b.com").await;
    let account_id = app.tokens.account_id_for_slot().unwrap();

    let before = app.tokens.record(account_id).unwrap().last_used;
    let (status, _) = app.get_authed("/auth/profile", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.tokens.record(account_id).unwrap().last_used >= before);
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_not_found() -> Result<()> {
    let app = common::test_app();

    let (status, body) = app.post_json("/auth/nope", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found");
    Ok(())
}
