use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::mailer::MailError;

pub type Result<T> = std::result::Result<T, AppError>;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authorized")]
    Unauthorized,

    #[error("User not found")]
    NotFound,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Please fill in all required fields")]
    Validation {
        missing_fields: Vec<String>,
        invalid_fields: Vec<String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::InvalidOrExpiredToken => "invalid_or_expired_token",
            Self::Validation { .. } => "validation_error",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database: {}", err))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token signing: {}", err))
    }
}

/// Request-shape violations reported by `validator`. Field names only, the
/// offending values are never echoed back.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut missing_fields = Vec::new();
        let mut invalid_fields = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            if field_errors.iter().any(|e| e.code == "length") {
                missing_fields.push(field.to_string());
            } else {
                invalid_fields.push(field.to_string());
            }
        }
        missing_fields.sort();
        invalid_fields.sort();

        Self::Validation {
            missing_fields,
            invalid_fields,
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        Self::Internal(format!("mail: {}", err))
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_fields: Vec<String>,
}

/// Detail of an internal failure, attached to the response extensions so the
/// error detail middleware can surface it outside production.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        match self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed with internal error");
                let body = ErrorResponse {
                    error: code,
                    message: "Server error".to_string(),
                    missing_fields: Vec::new(),
                    invalid_fields: Vec::new(),
                };
                let mut response = (status, Json(body)).into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            }
            Self::Validation {
                missing_fields,
                invalid_fields,
            } => {
                let message = if missing_fields.is_empty() {
                    "Some fields have invalid values".to_string()
                } else {
                    "Please fill in all required fields".to_string()
                };
                let body = ErrorResponse {
                    error: code,
                    message,
                    missing_fields,
                    invalid_fields,
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body = ErrorResponse {
                    error: code,
                    message: other.to_string(),
                    missing_fields: Vec::new(),
                    invalid_fields: Vec::new(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Unwraps a JSON body, turning extractor rejections into JSON error bodies.
pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
