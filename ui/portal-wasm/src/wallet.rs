//! `window.solana` as a [`WalletProvider`].

use async_trait::async_trait;
use js_sys::{Object, Reflect};
use lp_api_types::WalletAddress;
use lp_portal_core::{WalletError, WalletProvider};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::js;

pub const PROVIDER_PROPERTY: &str = "solana";

/// Looks the provider up on every call, since extensions may inject it after
/// the module starts.
#[derive(Clone, Copy, Debug, Default)]
pub struct InjectedProvider;

impl InjectedProvider {
    fn handle(&self) -> Option<JsValue> {
        js::window_property(PROVIDER_PROPERTY)
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    fn is_present(&self) -> bool {
        self.handle().is_some()
    }

    fn self_identifies(&self) -> bool {
        self.handle()
            .map(|solana| js::get_bool(&solana, "isPhantom"))
            .unwrap_or(false)
    }

    async fn connect(&self, trusted_only: bool) -> Result<WalletAddress, WalletError> {
        let solana = self.handle().ok_or(WalletError::ProviderMissing)?;

        let options = Object::new();
        if trusted_only {
            Reflect::set(&options, &"onlyIfTrusted".into(), &JsValue::TRUE)
                .map_err(|e| WalletError::Rejected(js::error_message(&e)))?;
        }

        let promise = js::call_method(&solana, "connect", &[options.into()])
            .map_err(|e| WalletError::Rejected(js::error_message(&e)))?;
        let response = JsFuture::from(promise)
            .await
            .map_err(|e| WalletError::Rejected(js::error_message(&e)))?;

        // Older providers resolve with nothing and expose the key on the provider itself.
        let key = js::get(&response, "publicKey")
            .ok()
            .filter(|k| !k.is_undefined() && !k.is_null())
            .or_else(|| js::get(&solana, "publicKey").ok())
            .unwrap_or(JsValue::UNDEFINED);

        match js::to_display_string(&key) {
            Some(text) if !text.trim().is_empty() => Ok(WalletAddress(text)),
            _ => Err(WalletError::Malformed(format!("{key:?}"))),
        }
    }
}
