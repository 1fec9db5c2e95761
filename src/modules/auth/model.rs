use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub type AccountId = i64;

/// A registered identity. Never serialized: the password hash and reset
/// token digest must not leave the service.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub biodata_completed: bool,
    /// SHA-256 digest of the outstanding reset token, if any.
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// A reset token is usable up to and including its expiry instant.
    pub fn reset_token_live_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_token, self.reset_token_expiry) {
            (Some(_), Some(expiry)) => now <= expiry,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
}
