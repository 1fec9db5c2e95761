use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::errors::{json_body, Result};
use crate::middleware::auth::AuthenticatedAccount;
use crate::modules::profile::{
    crud::BiodataCrud,
    gating,
    schema::{BiodataRequest, BiodataResponse, CheckBiodataResponse, SaveBiodataResponse},
};
use crate::AppState;

pub async fn save_biodata(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<BiodataRequest>, JsonRejection>,
) -> Result<Json<SaveBiodataResponse>> {
    let req = json_body(payload)?;

    let record = BiodataCrud::new(state.biodata.as_ref())
        .upsert(account.id, &req)
        .await?;

    Ok(Json(SaveBiodataResponse {
        success: true,
        message: "Biodata saved successfully!",
        user_id: account.id,
        biodata_id: record.id,
    }))
}

pub async fn get_biodata(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<Json<BiodataResponse>> {
    let record = BiodataCrud::new(state.biodata.as_ref())
        .find_by_account(account.id)
        .await?;

    let message = record.is_none().then_some("No biodata found");
    Ok(Json(BiodataResponse {
        success: true,
        message,
        data: record,
    }))
}

pub async fn check_biodata(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<Json<CheckBiodataResponse>> {
    let status = gating::gate_status(state.biodata.as_ref(), account.id).await?;
    tracing::debug!(
        account_id = account.id,
        requires_biodata = status.requires_biodata,
        "biodata gate checked"
    );

    Ok(Json(CheckBiodataResponse {
        success: true,
        requires_biodata: status.requires_biodata,
        has_biodata: status.has_biodata(),
        biodata: status.biodata,
    }))
}
