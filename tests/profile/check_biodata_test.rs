use axum::http::StatusCode;
use serde_json::json;

use crate::common::{complete_biodata, TestContext};

#[tokio::test]
async fn new_account_requires_biodata() {
    let ctx = TestContext::new().await;
    let (_, token, _) = ctx.register_user().await;

    let response = ctx
        .server
        .get("/profile/check-biodata")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["requiresBiodata"], json!(true));
    assert_eq!(body["hasBiodata"], json!(false));
    assert_eq!(body["biodata"], json!(null));
}

#[tokio::test]
async fn complete_biodata_lifts_the_gate() {
    let ctx = TestContext::new().await;
    let (_, token, _) = ctx.register_user().await;

    ctx.server
        .post("/profile/biodata")
        .authorization_bearer(&token)
        .json(&complete_biodata())
        .await
        .assert_status(StatusCode::OK);

    let body: serde_json::Value = ctx
        .server
        .get("/profile/check-biodata")
        .authorization_bearer(&token)
        .await
        .json();

    assert_eq!(body["requiresBiodata"], json!(false));
    assert_eq!(body["hasBiodata"], json!(true));
    assert_eq!(body["biodata"]["surname"], "Doe");
}

#[tokio::test]
async fn gate_survives_fresh_login() {
    let ctx = TestContext::new().await;
    let (email, token, _) = ctx.register_user().await;

    ctx.server
        .post("/profile/biodata")
        .authorization_bearer(&token)
        .json(&complete_biodata())
        .await;

    let login: serde_json::Value = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": crate::common::test_password() }))
        .await
        .json();
    let fresh = login["token"].as_str().unwrap();

    let body: serde_json::Value = ctx
        .server
        .get("/profile/check-biodata")
        .authorization_bearer(fresh)
        .await
        .json();
    assert_eq!(body["requiresBiodata"], json!(false));
}
