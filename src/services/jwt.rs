use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::modules::auth::model::AccountId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // account id
    pub exp: i64,           // expiration time
    pub iat: i64,           // issued at
    pub jti: String,        // unique token id
}

/// Issues and verifies the bearer tokens handed out at register/login.
/// The signing key is fixed for the lifetime of the service.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_duration: Duration,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_duration: Duration::days(30),
        }
    }

    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    pub fn issue(&self, account_id: AccountId) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.session_duration;

        let claims = Claims {
            sub: account_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Resolves a token to its account id. Any signature, expiry or claim
    /// problem is reported as `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<AccountId, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            AppError::Unauthorized
        })?;

        data.claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| AppError::Unauthorized)
    }

    pub fn session_duration_secs(&self) -> i64 {
        self.session_duration.num_seconds()
    }
}
