use async_trait::async_trait;

use super::model::{Biodata, BiodataFields};
use crate::errors::Result;
use crate::modules::auth::model::AccountId;

#[async_trait]
pub trait BiodataRepository: Send + Sync {
    /// Inserts or fully overwrites the account's single record and sets the
    /// account's `biodata_completed` flag, as one atomic write.
    async fn upsert(&self, account_id: AccountId, fields: &BiodataFields) -> Result<Biodata>;

    async fn find_by_account(&self, account_id: AccountId) -> Result<Option<Biodata>>;
}
