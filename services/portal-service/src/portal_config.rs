use axum::{Json, extract::State};
use lp_api_types::PortalConfigResponse;
use lp_crypto::Signer;
use std::sync::Arc;

use crate::AppState;
use crate::cosign::CO_SIGN_PATH;

/// Runtime configuration for the browser: which cluster and program to talk
/// to, which storage account holds the entries, and where to get the storage
/// account's signature when initialising it.
pub(crate) async fn portal_config(State(state): State<Arc<AppState>>) -> Json<PortalConfigResponse> {
    Json(PortalConfigResponse {
        cluster_url: state.config.cluster.endpoint.clone(),
        commitment: state.config.cluster.commitment,
        program_id: state.config.program_id.to_string(),
        storage_account: state.keypair.address().to_string(),
        co_signer_path: Some(CO_SIGN_PATH.to_owned()),
    })
}
