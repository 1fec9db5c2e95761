use super::interface::BiodataRepository;
use super::model::Biodata;
use super::schema::BiodataRequest;
use crate::errors::Result;
use crate::modules::auth::model::AccountId;

pub struct BiodataCrud<'a> {
    biodata: &'a dyn BiodataRepository,
}

impl<'a> BiodataCrud<'a> {
    pub fn new(biodata: &'a dyn BiodataRepository) -> Self {
        Self { biodata }
    }

    /// Validates the whole submission before touching storage; a rejected
    /// submission leaves the previous record and the account flag as they were.
    pub async fn upsert(&self, account_id: AccountId, request: &BiodataRequest) -> Result<Biodata> {
        let fields = match request.validate() {
            Ok(fields) => fields,
            Err(err) => {
                tracing::info!(account_id, error = %err, "biodata submission rejected");
                return Err(err);
            }
        };

        let record = self.biodata.upsert(account_id, &fields).await?;
        tracing::info!(account_id, biodata_id = record.id, "biodata saved");
        Ok(record)
    }

    pub async fn find_by_account(&self, account_id: AccountId) -> Result<Option<Biodata>> {
        self.biodata.find_by_account(account_id).await
    }
}
