//! End-to-end tests for the credential flows and session guards.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use reqwest::StatusCode;
use streamflix_integration_tests::{EMAIL, PASSWORD, TestContext, location};

// ============================================================================
// Session guards
// ============================================================================

#[tokio::test]
async fn test_guests_are_sent_to_auth() {
    let ctx = TestContext::new().await;

    for path in ["/account", "/favorites"] {
        let response = ctx.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/auth", "{path}");
    }
}

#[tokio::test]
async fn test_signed_in_users_skip_auth_page() {
    let ctx = TestContext::new().await;
    ctx.sign_in().await;

    let response = ctx.get("/auth").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_invalid_email_never_leaves_the_site() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/auth",
            &[("mode", "signin"), ("email", "ada@"), ("password", PASSWORD)],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Invalid email address"));
    assert_eq!(ctx.remote.total_calls(), 0);
}

#[tokio::test]
async fn test_toggle_changes_fields() {
    let ctx = TestContext::new().await;

    let sign_in = ctx.get("/auth").await.text().await.unwrap();
    let sign_up = ctx.get("/auth?mode=signup").await.text().await.unwrap();

    assert!(!sign_in.contains("firstName"));
    assert!(sign_up.contains("firstName"));
    assert!(sign_up.contains("lastName"));
}

// ============================================================================
// Remote failures
// ============================================================================

#[tokio::test]
async fn test_signup_conflict_skips_session_issuance() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/auth",
            &[
                ("mode", "signup"),
                ("email", EMAIL),
                ("password", PASSWORD),
                ("firstName", "Ada"),
                ("lastName", "Lovelace"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = response.text().await.unwrap();
    assert!(html.contains("Incorrect Credentials"));
    assert_eq!(ctx.remote.calls().sign_in.load(Ordering::SeqCst), 0);

    // Still a guest
    let response = ctx.get("/account").await;
    assert_eq!(location(&response), "/auth");
}

// ============================================================================
// Full journey
// ============================================================================

#[tokio::test]
async fn test_signup_browse_and_sign_out() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/auth",
            &[
                ("mode", "signup"),
                ("email", "grace@example.com"),
                ("password", "cobol-1959"),
                ("firstName", "Grace"),
                ("lastName", "Hopper"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/profiles");

    let account = ctx.get("/account").await;
    assert_eq!(account.status(), StatusCode::OK);
    let html = account.text().await.unwrap();
    assert!(html.contains("Grace Hopper"));
    assert!(html.contains("grace@example.com"));

    let response = ctx.post_form("/favorites/m3", &[]).await;
    assert_eq!(location(&response), "/favorites");
    let favorites = ctx.get("/favorites").await.text().await.unwrap();
    assert!(favorites.contains("Tears of Steel"));

    let response = ctx.post_form("/auth/logout", &[]).await;
    assert_eq!(location(&response), "/auth");
    assert_eq!(ctx.remote.calls().sign_out.load(Ordering::SeqCst), 1);

    let response = ctx.get("/favorites").await;
    assert_eq!(location(&response), "/auth");
}
