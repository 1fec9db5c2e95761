use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn register_with_valid_data_returns_created() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["userId"].as_i64().is_some());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_token_opens_protected_routes() {
    let ctx = TestContext::new().await;
    let (_, token, _) = ctx.register_user().await;

    let response = ctx
        .server
        .get("/profile/check-biodata")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn register_with_existing_email_returns_bad_request() {
    let ctx = TestContext::new().await;
    let email = test_email();

    ctx.server
        .post("/auth/register")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({ "email": &email, "password": "AnotherPassword456!" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn register_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "invalid-email",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["invalidFields"], json!(["email"]));
}

#[tokio::test]
async fn register_with_empty_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": test_email(),
            "password": ""
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["missingFields"], json!(["password"]));
}

#[tokio::test]
async fn register_with_malformed_body_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({ "email": test_email() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
}
