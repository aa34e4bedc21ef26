use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use lp_api_types::{BaseAccountSignRequest, BaseAccountSignResponse};
use lp_crypto::Signer;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{AppState, ApiResult, bad_request, forbidden, internal_error};

pub(crate) const CO_SIGN_PATH: &str = "/base-account/sign";

/// Largest transaction the ledger accepts in one packet.
pub(crate) const MAX_MESSAGE_BYTES: usize = 1232;

/// Sign a transaction message as the storage account.
///
/// Only messages that reference both the configured program and the storage
/// account are signed, so the key cannot be lent to a transaction that hands
/// the account to some other program. With `PORTAL_ALLOWED_ORIGIN` set, the
/// request must also come from that origin.
pub(crate) async fn base_account_sign(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<BaseAccountSignRequest>,
) -> ApiResult<BaseAccountSignResponse> {
    if let Some(allowed) = state.config.allowed_origin.as_deref() {
        let origin = headers
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok());
        if origin != Some(allowed) {
            warn!("refused co-sign request from origin {:?}", origin);
            return Err(forbidden("origin not allowed"));
        }
    }

    let encoded = request.message.trim();
    if encoded.is_empty() {
        return Err(bad_request("message cannot be empty"));
    }

    let message = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| bad_request("message must be valid base64"))?;

    if message.len() > MAX_MESSAGE_BYTES {
        return Err(bad_request("message exceeds the transaction size limit"));
    }

    let program_id = state.config.program_id.to_bytes().map_err(internal_error)?;
    let storage_account = state.keypair.public_key_bytes();
    if !references(&message, &program_id) || !references(&message, &storage_account) {
        warn!("refused co-sign request for a message outside the link program");
        return Err(bad_request(
            "message must reference the link program and the storage account",
        ));
    }

    let signature = state.keypair.sign(&message).map_err(internal_error)?;
    let public_key = state.keypair.address();
    info!("co-signed {} byte message for {}", message.len(), public_key);

    Ok(Json(BaseAccountSignResponse {
        public_key: public_key.to_string(),
        signature: STANDARD.encode(signature),
    }))
}

fn references(message: &[u8], key: &[u8; 32]) -> bool {
    message.windows(key.len()).any(|window| window == &key[..])
}
