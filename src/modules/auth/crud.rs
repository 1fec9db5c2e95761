use chrono::{Duration, Utc};

use super::interface::AccountRepository;
use super::model::{Account, AccountId, NewAccount};
use crate::errors::{AppError, Result};
use crate::services::mailer::{Mailer, OutgoingMail};
use crate::services::{hashing, tokens};

/// How long an emailed reset link stays valid.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

pub fn reset_token_ttl() -> Duration {
    Duration::seconds(RESET_TOKEN_TTL_SECS)
}

// =============================================================================
// ACCOUNT CRUD
// =============================================================================

pub struct AccountCrud<'a> {
    accounts: &'a dyn AccountRepository,
}

impl<'a> AccountCrud<'a> {
    pub fn new(accounts: &'a dyn AccountRepository) -> Self {
        Self { accounts }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AccountId> {
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict);
        }

        let password_hash = hashing::hash_password(password)?;

        // The unique index still guards against a concurrent registration.
        let account = self
            .accounts
            .insert(&NewAccount {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(account_id = account.id, "account registered");
        Ok(account.id)
    }

    /// Unknown email and wrong password fail identically, and both paths
    /// run one argon2 verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            hashing::verify_against_dummy(password);
            return Err(AppError::InvalidCredentials);
        };

        if !hashing::verify_password(password, &account.password_hash)? {
            tracing::debug!(account_id = account.id, "password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        Ok(account)
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        self.accounts.find_by_id(id).await
    }
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

pub struct PasswordResetCrud<'a> {
    accounts: &'a dyn AccountRepository,
    mailer: &'a dyn Mailer,
}

impl<'a> PasswordResetCrud<'a> {
    pub fn new(accounts: &'a dyn AccountRepository, mailer: &'a dyn Mailer) -> Self {
        Self { accounts, mailer }
    }

    /// Issues a fresh reset token, replacing any outstanding one, and mails a
    /// link to it. The token is stored before the mail goes out.
    pub async fn request_reset(&self, email: &str, link_base: &str) -> Result<()> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        let token = tokens::generate_reset_token();
        let expires_at = Utc::now() + reset_token_ttl();

        self.accounts
            .set_reset_token(account.id, &tokens::digest_token(&token), expires_at)
            .await?;
        tracing::info!(account_id = account.id, %expires_at, "password reset requested");

        let reset_url = format!(
            "{}/reset-password.html?token={}",
            link_base.trim_end_matches('/'),
            token
        );
        self.mailer
            .send(reset_mail(&account.email, &reset_url))
            .await?;

        Ok(())
    }

    pub async fn complete_reset(&self, token: &str, new_password: &str) -> Result<()> {
        let digest = tokens::digest_token(token);
        let now = Utc::now();

        let account = self
            .accounts
            .find_by_reset_token(&digest)
            .await?
            .ok_or(AppError::InvalidOrExpiredToken)?;

        if !account.reset_token_live_at(now) {
            self.accounts.clear_reset_token(account.id, &digest).await?;
            tracing::info!(account_id = account.id, "expired reset token discarded");
            return Err(AppError::InvalidOrExpiredToken);
        }

        let password_hash = hashing::hash_password(new_password)?;

        if !self
            .accounts
            .commit_password_reset(account.id, &digest, &password_hash, now)
            .await?
        {
            return Err(AppError::InvalidOrExpiredToken);
        }

        tracing::info!(account_id = account.id, "password reset completed");
        Ok(())
    }
}

fn reset_mail(to: &str, reset_url: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        html_body: format!(
            "<h2>Password Reset Request</h2>\
             <p>You requested a password reset. Click the link below to reset your password:</p>\
             <a href=\"{url}\">{url}</a>\
             <p>This link will expire in 1 hour.</p>\
             <p>If you didn't request this, please ignore this email.</p>",
            url = reset_url
        ),
        text_body: format!(
            "You requested a password reset. Open the link below to choose a new password:\n\n\
             {}\n\nThis link will expire in 1 hour.\n\
             If you didn't request this, please ignore this email.\n",
            reset_url
        ),
    }
}
