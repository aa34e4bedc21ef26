//! HTTP client for portal-service.
//!
//! `base_url()` honours a `<meta name="portal-service">` override and falls
//! back to the page host on port 8080.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use gloo_net::http::Request;
use lp_api_types::{BaseAccountSignRequest, BaseAccountSignResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dom;

pub fn base_url() -> String {
    if let Some(meta) = dom::query(r#"meta[name="portal-service"]"#) {
        let content = meta.get_attribute("content").unwrap_or_default();
        let content = content.trim();
        if !content.is_empty() {
            return content.trim_end_matches('/').to_string();
        }
    }

    let loc = dom::window().location();
    let host = loc.hostname().unwrap_or_default();
    let protocol = loc.protocol().unwrap_or_else(|_| "http:".into());
    format!("{}//{}:8080", protocol, host)
}

/// Absolute URLs pass through; paths are joined onto `base`.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {}", e))?;

    if !resp.ok() {
        let text = resp.text().await.unwrap_or_default();
        return Err(format!("{} {}: {}", resp.status(), resp.status_text(), text));
    }

    resp.json::<T>()
        .await
        .map_err(|e| format!("JSON parse error: {}", e))
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
    let resp = Request::post(url)
        .json(body)
        .map_err(|e| format!("{}", e))?
        .send()
        .await
        .map_err(|e| format!("fetch error: {}", e))?;

    if !resp.ok() {
        let text = resp.text().await.unwrap_or_default();
        return Err(format!("{} {}: {}", resp.status(), resp.status_text(), text));
    }

    resp.json::<T>()
        .await
        .map_err(|e| format!("JSON parse error: {}", e))
}

/// Ask portal-service to sign `message` with the storage account key.
pub async fn co_sign(url: &str, message: &[u8]) -> Result<Vec<u8>, String> {
    let request = BaseAccountSignRequest {
        message: STANDARD.encode(message),
    };
    let response: BaseAccountSignResponse = post_json(url, &request).await?;
    STANDARD
        .decode(response.signature.as_bytes())
        .map_err(|e| format!("signature is not base64: {}", e))
}
