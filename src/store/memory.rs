//! In-process storage with the same contract as the MySQL store. Both
//! tables sit behind one lock, so each repository call is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::errors::{AppError, Result};
use crate::modules::auth::interface::AccountRepository;
use crate::modules::auth::model::{Account, AccountId, NewAccount};
use crate::modules::profile::interface::BiodataRepository;
use crate::modules::profile::model::{Biodata, BiodataFields, BiodataId};

#[derive(Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    biodata: HashMap<AccountId, Biodata>,
    next_account_id: AccountId,
    next_biodata_id: BiodataId,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn insert(&self, account: &NewAccount) -> Result<Account> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::Conflict);
        }

        tables.next_account_id += 1;
        let now = Utc::now();
        let created = Account {
            id: tables.next_account_id,
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            biodata_completed: false,
            reset_token: None,
            reset_token_expiry: None,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.reset_token.as_deref() == Some(token_digest))
            .cloned())
    }

    async fn set_reset_token(
        &self,
        id: AccountId,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.accounts.get_mut(&id) {
            account.reset_token = Some(token_digest.to_string());
            account.reset_token_expiry = Some(expires_at);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_reset_token(&self, id: AccountId, token_digest: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.accounts.get_mut(&id) {
            if account.reset_token.as_deref() == Some(token_digest) {
                account.reset_token = None;
                account.reset_token_expiry = None;
                account.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn commit_password_reset(
        &self,
        id: AccountId,
        token_digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(account) = tables.accounts.get_mut(&id) else {
            return Ok(false);
        };
        if account.reset_token.as_deref() != Some(token_digest) || !account.reset_token_live_at(now) {
            return Ok(false);
        }

        account.password_hash = password_hash.to_string();
        account.reset_token = None;
        account.reset_token_expiry = None;
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: AccountId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.accounts.remove(&id).is_some();
        if removed {
            tables.biodata.remove(&id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BiodataRepository for MemoryStore {
    async fn upsert(&self, account_id: AccountId, fields: &BiodataFields) -> Result<Biodata> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&account_id) {
            return Err(AppError::Internal(format!(
                "biodata owner {} does not exist",
                account_id
            )));
        }

        let now = Utc::now();
        let (id, created_at) = match tables.biodata.get(&account_id) {
            Some(existing) => (existing.id, existing.created_at),
            None => {
                tables.next_biodata_id += 1;
                (tables.next_biodata_id, now)
            }
        };

        let record = Biodata::from_fields(id, account_id, fields.clone(), created_at, now);
        tables.biodata.insert(account_id, record.clone());

        if let Some(account) = tables.accounts.get_mut(&account_id) {
            account.biodata_completed = true;
            account.updated_at = now;
        }
        Ok(record)
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Option<Biodata>> {
        Ok(self.tables.read().await.biodata.get(&account_id).cloned())
    }
}
