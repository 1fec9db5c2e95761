use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::errors::AppError;
use crate::modules::auth::interface::AccountRepository;
use crate::modules::auth::model::AccountId;
use crate::AppState;

/// The caller resolved from a valid bearer token, available to handlers as
/// `Extension<AuthenticatedAccount>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: AccountId,
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Rejects the request with 401 before it reaches a protected handler unless
/// it carries a valid session token for an existing account.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let id = state.jwt_service.verify(token)?;

    // A signed token outlives its account; deleted accounts get no access.
    if state.accounts.find_by_id(id).await?.is_none() {
        tracing::debug!(account_id = id, "session token for missing account");
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(AuthenticatedAccount { id });
    Ok(next.run(request).await)
}
