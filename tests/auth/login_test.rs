use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let ctx = TestContext::new().await;
    let (email, _, user_id) = ctx.register_user().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["userId"], user_id);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn login_with_wrong_password_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": "WrongPassword123!"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_email_looks_like_wrong_password() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    let wrong_password = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": "nope" }))
        .await;
    let unknown_email = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": test_email(), "password": test_password() }))
        .await;

    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<serde_json::Value>(),
        unknown_email.json::<serde_json::Value>()
    );
}

#[tokio::test]
async fn login_email_is_case_sensitive() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": email.to_uppercase(),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
