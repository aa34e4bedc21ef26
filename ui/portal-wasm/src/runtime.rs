//! [`ProgramRuntime`] backed by the page's `window.portalRuntime` object.
//!
//! The host object owns transaction building, wallet signing and account
//! decoding. Each method takes one request object and returns a promise:
//!
//! ```text
//! initialize({ endpoint, commitment, programId, storageAccount,
//!              systemProgram, payer, coSign? })           -> Promise<void>
//! append({ ...same, link })                                -> Promise<void>
//! fetch({ ...same })  -> Promise<{ gifList: [{ gifLink, userAddress }] }>
//! ```
//!
//! `coSign(Uint8Array) -> Promise<Uint8Array>` is attached to `initialize`
//! requests when a co-signer URL is configured, so the storage account key
//! never has to reach the page.

use async_trait::async_trait;
use js_sys::{JSON, Promise, Reflect, Uint8Array};
use lp_api_types::{Entry, WalletAddress};
use lp_program_client::{CallContext, ProgramError, ProgramRuntime};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use crate::{api, js};

pub const RUNTIME_PROPERTY: &str = "portalRuntime";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HostRequest<'a> {
    endpoint: &'a str,
    commitment: &'a str,
    program_id: &'a str,
    storage_account: &'a str,
    system_program: &'a str,
    payer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
}

impl<'a> HostRequest<'a> {
    fn new(ctx: &'a CallContext, link: Option<&'a str>) -> Self {
        Self {
            endpoint: &ctx.endpoint,
            commitment: ctx.commitment.as_str(),
            program_id: ctx.program_id.as_str(),
            storage_account: ctx.storage_account.as_str(),
            system_program: ctx.system_program.as_str(),
            payer: &ctx.payer.0,
            link,
        }
    }
}

type CoSignFn = Closure<dyn FnMut(Uint8Array) -> Promise>;

#[derive(Clone, Debug, Default)]
pub struct HostRuntime {
    co_signer_url: Option<String>,
}

impl HostRuntime {
    pub fn new(co_signer_url: Option<String>) -> Self {
        Self { co_signer_url }
    }

    fn host(&self) -> Result<JsValue, ProgramError> {
        js::window_property(RUNTIME_PROPERTY).ok_or_else(|| {
            ProgramError::Transport(format!("window.{RUNTIME_PROPERTY} is not installed"))
        })
    }

    async fn call(
        &self,
        method: &str,
        ctx: &CallContext,
        request: &HostRequest<'_>,
        co_sign: Option<&CoSignFn>,
    ) -> Result<JsValue, ProgramError> {
        let host = self.host()?;
        let request = serde_wasm_bindgen::to_value(request)
            .map_err(|e| ProgramError::Transport(e.to_string()))?;
        if let Some(co_sign) = co_sign {
            let co_sign: &JsValue = co_sign.as_ref();
            Reflect::set(&request, &"coSign".into(), co_sign)
                .map_err(|e| ProgramError::Transport(js::error_message(&e)))?;
        }

        let classify = |err: JsValue| ProgramError::classify(&js::error_message(&err), &ctx.storage_account);
        let promise = js::call_method(&host, method, &[request]).map_err(classify)?;
        JsFuture::from(promise).await.map_err(classify)
    }

    fn co_sign_closure(&self) -> Option<CoSignFn> {
        let url = self.co_signer_url.clone()?;
        Some(Closure::wrap(Box::new(move |message: Uint8Array| {
            let url = url.clone();
            let bytes = message.to_vec();
            future_to_promise(async move {
                let signature = api::co_sign(&url, &bytes)
                    .await
                    .map_err(|e| JsValue::from(js_sys::Error::new(&e)))?;
                Ok(Uint8Array::from(signature.as_slice()).into())
            })
        }) as Box<dyn FnMut(Uint8Array) -> Promise>))
    }
}

#[async_trait(?Send)]
impl ProgramRuntime for HostRuntime {
    async fn initialize(&self, ctx: &CallContext) -> Result<(), ProgramError> {
        // Must outlive the host call; dropping it invalidates the JS function.
        let co_sign = self.co_sign_closure();
        self.call("initialize", ctx, &HostRequest::new(ctx, None), co_sign.as_ref())
            .await?;
        Ok(())
    }

    async fn append(&self, ctx: &CallContext, link: &str) -> Result<(), ProgramError> {
        self.call("append", ctx, &HostRequest::new(ctx, Some(link)), None)
            .await?;
        Ok(())
    }

    async fn fetch(&self, ctx: &CallContext) -> Result<Vec<Entry>, ProgramError> {
        let account = self
            .call("fetch", ctx, &HostRequest::new(ctx, None), None)
            .await?;
        decode_entries(&account)
    }
}

/// Account data as the host hands it back. `userAddress` arrives as a
/// `PublicKey`, whose `toJSON` yields the base58 string.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountData {
    GifList {
        #[serde(rename = "gifList")]
        gif_list: Vec<RawEntry>,
    },
    Entries {
        entries: Vec<RawEntry>,
    },
    Bare(Vec<RawEntry>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    gif_link: String,
    user_address: String,
}

fn decode_entries(account: &JsValue) -> Result<Vec<Entry>, ProgramError> {
    let json = JSON::stringify(account)
        .map_err(|e| ProgramError::Decode(js::error_message(&e)))?
        .as_string()
        .ok_or_else(|| ProgramError::Decode("account data is not serialisable".to_owned()))?;
    entries_from_json(&json)
}

/// Accepts `{ gifList: [...] }`, `{ entries: [...] }` or a bare array.
fn entries_from_json(raw: &str) -> Result<Vec<Entry>, ProgramError> {
    let data: AccountData =
        serde_json::from_str(raw).map_err(|e| ProgramError::Decode(e.to_string()))?;
    let list = match data {
        AccountData::GifList { gif_list } => gif_list,
        AccountData::Entries { entries } => entries,
        AccountData::Bare(list) => list,
    };

    Ok(list
        .into_iter()
        .map(|raw| Entry {
            submitter: WalletAddress(raw.user_address),
            link: raw.gif_link,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMITTER: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    #[test]
    fn gif_list_keeps_remote_order() {
        let raw = format!(
            r#"{{"gifList":[
                {{"gifLink":"https://x.com/a.gif","userAddress":"{SUBMITTER}"}},
                {{"gifLink":"https://x.com/b.gif","userAddress":"{SUBMITTER}","extra":1}}
            ]}}"#
        );
        let entries = entries_from_json(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link, "https://x.com/a.gif");
        assert_eq!(entries[1].link, "https://x.com/b.gif");
        assert_eq!(entries[0].submitter, WalletAddress::from(SUBMITTER));
    }

    #[test]
    fn entries_key_and_bare_arrays_are_accepted() {
        let item = format!(r#"{{"gifLink":"https://x.com/a.gif","userAddress":"{SUBMITTER}"}}"#);
        assert_eq!(entries_from_json(&format!(r#"{{"entries":[{item}]}}"#)).unwrap().len(), 1);
        assert_eq!(entries_from_json(&format!("[{item}]")).unwrap().len(), 1);
        assert!(entries_from_json(r#"{"gifList":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_accounts_are_decode_errors() {
        for raw in [
            r#"{}"#,
            r#"{"gifList":"nope"}"#,
            r#"{"gifList":[{"gifLink":"https://x.com/a.gif"}]}"#,
            r#"{"gifList":[{"gifLink":"https://x.com/a.gif","userAddress":{"_bn":"00"}}]}"#,
            "undefined",
        ] {
            assert!(
                matches!(entries_from_json(raw), Err(ProgramError::Decode(_))),
                "{raw} should not decode"
            );
        }
    }
}
