use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Account, AccountId, NewAccount};
use crate::errors::Result;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account with `biodata_completed = false`.
    /// Fails with `AppError::Conflict` when the email is taken.
    async fn insert(&self, account: &NewAccount) -> Result<Account>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<Account>>;

    /// Replaces any outstanding reset token.
    async fn set_reset_token(
        &self,
        id: AccountId,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Clears the reset token, but only while `token_digest` is still the one stored.
    async fn clear_reset_token(&self, id: AccountId, token_digest: &str) -> Result<()>;

    /// Stores the new password hash and clears the reset token in one atomic
    /// step, provided `token_digest` is still stored and unexpired at `now`.
    /// Returns `false` when the token was consumed, replaced or expired meanwhile.
    async fn commit_password_reset(
        &self,
        id: AccountId,
        token_digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Removes the account together with its biodata.
    async fn delete(&self, id: AccountId) -> Result<bool>;
}
