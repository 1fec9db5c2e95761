use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::errors::{ErrorResponse, InternalErrorDetail};
use crate::AppState;

/// Outside production, adds the underlying cause to 500 bodies so failures
/// can be debugged from the client. Production keeps the generic message.
pub async fn expose_error_detail(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.expose_error_details || response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }
    let Some(InternalErrorDetail(detail)) = response.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return response;
    };

    let body = ErrorResponse {
        error: "internal_error",
        message: "Server error".to_string(),
        missing_fields: Vec::new(),
        invalid_fields: Vec::new(),
    };
    let mut value = serde_json::to_value(body).unwrap_or_default();
    value["detail"] = serde_json::Value::String(detail);

    (StatusCode::INTERNAL_SERVER_ERROR, Json(value)).into_response()
}
