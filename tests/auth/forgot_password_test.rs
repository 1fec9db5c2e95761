use axum::http::{header, HeaderValue, StatusCode};
use serde_json::json;

use alumni_portal::modules::auth::interface::AccountRepository;
use alumni_portal::services::tokens::digest_token;

use crate::common::{build_server, test_email, FailingMailer, TestContext};

#[tokio::test]
async fn forgot_password_with_unknown_email_returns_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/forgot-password")
        .json(&json!({ "email": "nobody@x.org" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User not found");
    assert!(ctx.mailer.sent().is_empty());
}

#[tokio::test]
async fn forgot_password_mails_reset_link() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    let response = ctx
        .server
        .post("/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Password reset email sent");

    let sent = ctx.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, email);
    assert_eq!(sent[0].subject, "Password Reset Request");

    let token = ctx.mailer.last_token();
    assert_eq!(token.len(), 64);
    assert!(sent[0]
        .html_body
        .contains(&format!("http://localhost:3000/reset-password.html?token={}", token)));
}

#[tokio::test]
async fn forgot_password_link_ignores_foreign_origin() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    ctx.server
        .post("/auth/forgot-password")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://attacker.example"))
        .json(&json!({ "email": &email }))
        .await
        .assert_status(StatusCode::OK);

    let sent = ctx.mailer.sent();
    assert!(!sent[0].text_body.contains("attacker.example"));
    assert!(!sent[0].html_body.contains("attacker.example"));
    assert!(sent[0]
        .text_body
        .contains("http://localhost:3000/reset-password.html?token="));
}

#[tokio::test]
async fn forgot_password_stores_only_token_digest() {
    let ctx = TestContext::new().await;
    let (email, _, _) = ctx.register_user().await;

    ctx.server
        .post("/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;

    let token = ctx.mailer.last_token();
    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();

    assert_eq!(account.reset_token, Some(digest_token(&token)));
    assert!(account.reset_token_expiry.is_some());
}

#[tokio::test]
async fn forgot_password_mail_failure_returns_server_error() {
    let store = std::sync::Arc::new(alumni_portal::store::MemoryStore::new());
    let server = build_server(store.clone(), store, std::sync::Arc::new(FailingMailer), true).await;
    let email = test_email();

    server
        .post("/auth/register")
        .json(&json!({ "email": &email, "password": "pw" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Server error");
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("relay unreachable")));
}

#[tokio::test]
async fn server_error_detail_is_hidden_in_production() {
    let store = std::sync::Arc::new(alumni_portal::store::MemoryStore::new());
    let server = build_server(store.clone(), store, std::sync::Arc::new(FailingMailer), false).await;
    let email = test_email();

    server
        .post("/auth/register")
        .json(&json!({ "email": &email, "password": "pw" }))
        .await;

    let response = server
        .post("/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Server error");
    assert!(body.get("detail").is_none());
}
