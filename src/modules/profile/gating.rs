//! Decides whether an account has to fill in its biodata before it may use
//! the dashboard. Computed from the biodata table on every call; the cached
//! `biodata_completed` flag on the account is not consulted.

use super::interface::BiodataRepository;
use super::model::Biodata;
use crate::errors::Result;
use crate::modules::auth::model::AccountId;

/// Read-time completeness uses the same required-field set as write-time
/// validation.
pub fn is_complete(biodata: &Biodata) -> bool {
    biodata.blank_required_fields().is_empty()
}

#[derive(Debug, Clone)]
pub struct GateStatus {
    pub requires_biodata: bool,
    pub biodata: Option<Biodata>,
}

impl GateStatus {
    pub fn has_biodata(&self) -> bool {
        self.biodata.is_some()
    }
}

pub async fn gate_status(biodata: &dyn BiodataRepository, account_id: AccountId) -> Result<GateStatus> {
    let record = biodata.find_by_account(account_id).await?;
    let requires_biodata = !record.as_ref().is_some_and(is_complete);

    Ok(GateStatus {
        requires_biodata,
        biodata: record,
    })
}

pub async fn requires_biodata(biodata: &dyn BiodataRepository, account_id: AccountId) -> Result<bool> {
    Ok(gate_status(biodata, account_id).await?.requires_biodata)
}
