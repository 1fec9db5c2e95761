use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::errors::{json_body, Result};
use crate::modules::auth::{
    crud::{AccountCrud, PasswordResetCrud},
    schema::{
        ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
        ResetPasswordRequest, SessionResponse,
    },
};
use crate::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let req = json_body(payload)?;
    req.validate()?;

    let account_id = AccountCrud::new(state.accounts.as_ref())
        .register(&req.email, &req.password)
        .await?;
    let token = state.jwt_service.issue(account_id)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User registered successfully",
            token,
            user_id: account_id,
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>> {
    let req = json_body(payload)?;

    let account = AccountCrud::new(state.accounts.as_ref())
        .authenticate(&req.email, &req.password)
        .await?;
    let token = state.jwt_service.issue(account.id)?;

    Ok(Json(SessionResponse {
        message: "Login successful",
        token,
        user_id: account.id,
    }))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let req = json_body(payload)?;

    // Reset links only ever point at the configured public URL, never at a request header.
    PasswordResetCrud::new(state.accounts.as_ref(), state.mailer.as_ref())
        .request_reset(&req.email, &state.public_url)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset email sent",
    }))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let req = json_body(payload)?;
    req.validate()?;

    PasswordResetCrud::new(state.accounts.as_ref(), state.mailer.as_ref())
        .complete_reset(&req.token, &req.password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful",
    }))
}
