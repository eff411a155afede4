mod common;

use chirpy::auth::{issue_access_token_at, validate_access_token};
use chrono::{Duration, Utc};
use common::{spawn_app, TEST_SECRET};
use serde_json::{json, Value};
use uuid::Uuid;

// --- Registration ---

#[tokio::test]
async fn create_user_returns_201_without_password_hash() {
    let app = spawn_app().await;

    let response = app.create_user("walt@breakingbad.com", "correct-horse").await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "walt@breakingbad.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert!(body.get("id").is_some());
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn create_user_returns_409_for_duplicate_email() {
    let app = spawn_app().await;

    assert_eq!(201, app.create_user("saul@bettercall.com", "pw").await.status().as_u16());
    assert_eq!(409, app.create_user("saul@bettercall.com", "pw").await.status().as_u16());
}

#[tokio::test]
async fn create_user_returns_400_for_invalid_email() {
    let app = spawn_app().await;

    for invalid_email in ["notanemail", "user@", "@example.com", ""] {
        let response = app.create_user(invalid_email, "pw").await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject invalid email: {}",
            invalid_email
        );
    }
}

// --- Login ---

#[tokio::test]
async fn login_with_correct_password_returns_tokens() {
    let app = spawn_app().await;
    app.create_user("walt@breakingbad.com", "correct-horse").await;

    let response = app.login("walt@breakingbad.com", "correct-horse").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("Missing access token");
    let refresh_token = body["refresh_token"].as_str().expect("Missing refresh token");
    let id = body["user_id"].as_str().expect("Missing user_id");

    assert_eq!(refresh_token.len(), 64);
    assert_eq!(body["email"], "walt@breakingbad.com");
    assert!(body.get("id").is_none());
    assert!(body.get("hashed_password").is_none());
    assert_eq!(
        validate_access_token(token, TEST_SECRET).unwrap().to_string(),
        id
    );
}

#[tokio::test]
async fn malformed_bodies_get_generic_validation_error() {
    let app = spawn_app().await;

    let cases = [
        ("/api/login", r#"{"email":"a@b.com"}"#),
        ("/api/login", "not json"),
        ("/api/users", r#"{"email":42,"password":"pw"}"#),
    ];

    for (path, raw) in cases {
        let response = app
            .client
            .post(app.url(path))
            .header("Content-Type", "application/json")
            .body(raw)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(400, response.status().as_u16(), "body: {}", raw);

        let text = response.text().await.unwrap();
        assert!(!text.contains("missing field"), "leaked: {}", text);
        assert!(!text.contains("line 1"), "leaked: {}", text);

        let body: Value = serde_json::from_str(&text).expect("Error body is not JSON");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "body has invalid format");
        assert!(body["error_id"].as_str().is_some());
    }
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let app = spawn_app().await;
    app.create_user("walt@breakingbad.com", "correct-horse").await;

    let response = app.login("walt@breakingbad.com", "wrong").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let app = spawn_app().await;
    app.create_user("walt@breakingbad.com", "correct-horse").await;

    let wrong_password = app.login("walt@breakingbad.com", "wrong").await;
    let unknown_email = app.login("jesse@breakingbad.com", "correct-horse").await;

    assert_eq!(401, wrong_password.status().as_u16());
    assert_eq!(401, unknown_email.status().as_u16());

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a["code"], b["code"]);
    assert_eq!(a["message"], b["message"]);
}

// --- Refresh ---

#[tokio::test]
async fn refresh_returns_new_access_token_for_owner() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    let response = app.post_with_bearer("/api/refresh", &user.refresh_token).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().expect("Missing access token");
    assert_eq!(
        validate_access_token(token, TEST_SECRET).unwrap().to_string(),
        user.id
    );
}

#[tokio::test]
async fn refresh_token_survives_use() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    for _ in 0..2 {
        let response = app.post_with_bearer("/api/refresh", &user.refresh_token).await;
        assert_eq!(200, response.status().as_u16());
    }
}

#[tokio::test]
async fn refresh_rejects_unknown_or_missing_token() {
    let app = spawn_app().await;

    let unknown = app.post_with_bearer("/api/refresh", &"0".repeat(64)).await;
    assert_eq!(401, unknown.status().as_u16());

    let missing = app
        .client
        .post(app.url("/api/refresh"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, missing.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    let response = app.post_with_bearer("/api/refresh", &user.token).await;
    assert_eq!(401, response.status().as_u16());
}

// --- Revoke ---

#[tokio::test]
async fn revoked_refresh_token_is_rejected() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    let revoke = app.post_with_bearer("/api/revoke", &user.refresh_token).await;
    assert_eq!(204, revoke.status().as_u16());

    let refresh = app.post_with_bearer("/api/refresh", &user.refresh_token).await;
    assert_eq!(401, refresh.status().as_u16());
}

#[tokio::test]
async fn revoke_is_idempotent_and_does_not_confirm_existence() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    for token in [user.refresh_token.as_str(), user.refresh_token.as_str(), "never-issued"] {
        let response = app.post_with_bearer("/api/revoke", token).await;
        assert_eq!(204, response.status().as_u16());
    }
}

// --- Protected account update ---

#[tokio::test]
async fn update_user_changes_password() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;

    let response = app
        .client
        .put(app.url("/api/users"))
        .bearer_auth(&user.token)
        .json(&json!({ "email": "heisenberg@breakingbad.com", "password": "battery-staple" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "heisenberg@breakingbad.com");
    assert_eq!(body["id"], user.id.as_str());

    assert_eq!(401, app.login("walt@breakingbad.com", "correct-horse").await.status().as_u16());
    assert_eq!(
        200,
        app.login("heisenberg@breakingbad.com", "battery-staple").await.status().as_u16()
    );
}

#[tokio::test]
async fn update_user_rejects_bad_access_tokens() {
    let app = spawn_app().await;
    let user = app.signed_up("walt@breakingbad.com", "correct-horse").await;
    let account_id = Uuid::parse_str(&user.id).unwrap();

    let expired =
        issue_access_token_at(account_id, TEST_SECRET, Utc::now() - Duration::hours(2)).unwrap();
    let foreign = issue_access_token_at(account_id, "some-other-secret", Utc::now()).unwrap();

    for token in [expired.as_str(), foreign.as_str(), "garbage", user.refresh_token.as_str()] {
        let response = app
            .client
            .put(app.url("/api/users"))
            .bearer_auth(token)
            .json(&json!({ "email": "x@example.com", "password": "pw" }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(401, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
