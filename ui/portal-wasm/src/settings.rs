//! Start-up settings.
//!
//! Read from an inline `<script id="portalConfig" type="application/json">`
//! block when the page ships one, otherwise fetched from
//! `GET {portal-service}/portal/config`.

use lp_api_types::PortalConfigResponse;
use lp_program_client::ProgramConfig;
use serde::Deserialize;

use crate::{api, dom};

pub const INLINE_CONFIG_ID: &str = "portalConfig";
pub const CONFIG_PATH: &str = "/portal/config";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branding {
    pub title: String,
    pub subtitle: String,
    pub footer_handle: String,
    pub footer_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "Link Portal".to_string(),
            subtitle: "View your link collection".to_string(),
            footer_handle: "_buildspace".to_string(),
            footer_url: "https://twitter.com/_buildspace".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct InlineConfig {
    #[serde(flatten)]
    program: PortalConfigResponse,
    #[serde(default)]
    branding: Branding,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub program: ProgramConfig,
    /// Absolute URL of the storage-account co-signer, if the deployment has one.
    pub co_signer_url: Option<String>,
    pub branding: Branding,
}

impl Settings {
    /// Validate a config payload; relative co-signer paths are joined onto `base`.
    pub fn from_parts(
        response: &PortalConfigResponse,
        branding: Branding,
        base: &str,
    ) -> Result<Self, String> {
        let program = ProgramConfig::try_from(response).map_err(|e| e.to_string())?;
        let co_signer_url = response
            .co_signer_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| api::join_url(base, p));

        Ok(Self {
            program,
            co_signer_url,
            branding,
        })
    }

    pub fn from_inline_json(raw: &str, base: &str) -> Result<Self, String> {
        let inline: InlineConfig =
            serde_json::from_str(raw).map_err(|e| format!("#{INLINE_CONFIG_ID}: {e}"))?;
        Self::from_parts(&inline.program, inline.branding, base)
    }
}

pub async fn resolve() -> Result<Settings, String> {
    let base = api::base_url();

    if let Some(script) = dom::by_id(INLINE_CONFIG_ID) {
        let raw = script.text_content().unwrap_or_default();
        if !raw.trim().is_empty() {
            tracing::debug!("using inline portal config");
            return Settings::from_inline_json(&raw, &base);
        }
    }

    let url = api::join_url(&base, CONFIG_PATH);
    tracing::debug!("fetching portal config from {}", url);
    let response: PortalConfigResponse = api::get_json(&url).await?;
    Settings::from_parts(&response, Branding::default(), &base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_api_types::{Commitment, SYSTEM_PROGRAM_ID};

    const BASE: &str = "http://localhost:8080";

    #[test]
    fn inline_config_carries_branding_and_defaults_the_rest() {
        let raw = format!(
            r#"{{
                "cluster_url": "https://api.devnet.solana.com/",
                "program_id": "{SYSTEM_PROGRAM_ID}",
                "storage_account": "{SYSTEM_PROGRAM_ID}",
                "co_signer_path": "/base-account/sign",
                "branding": {{ "title": "GIF Portal" }}
            }}"#
        );

        let settings = Settings::from_inline_json(&raw, BASE).unwrap();
        assert_eq!(settings.program.cluster.endpoint, "https://api.devnet.solana.com");
        assert_eq!(settings.program.cluster.commitment, Commitment::Processed);
        assert_eq!(
            settings.co_signer_url.as_deref(),
            Some("http://localhost:8080/base-account/sign")
        );
        assert_eq!(settings.branding.title, "GIF Portal");
        assert_eq!(settings.branding.footer_handle, Branding::default().footer_handle);
    }

    #[test]
    fn absolute_co_signer_urls_pass_through_and_blank_ones_are_dropped() {
        let mut response = PortalConfigResponse {
            cluster_url: lp_program_client::DEVNET_URL.to_string(),
            commitment: Commitment::Confirmed,
            program_id: SYSTEM_PROGRAM_ID.to_string(),
            storage_account: SYSTEM_PROGRAM_ID.to_string(),
            co_signer_path: Some("https://signer.example/sign".to_string()),
        };
        let settings = Settings::from_parts(&response, Branding::default(), BASE).unwrap();
        assert_eq!(settings.co_signer_url.as_deref(), Some("https://signer.example/sign"));

        response.co_signer_path = Some("  ".to_string());
        let settings = Settings::from_parts(&response, Branding::default(), BASE).unwrap();
        assert_eq!(settings.co_signer_url, None);
    }

    #[test]
    fn bad_addresses_are_reported() {
        let raw = r#"{"cluster_url":"http://x","program_id":"nope","storage_account":"nope"}"#;
        assert!(Settings::from_inline_json(raw, BASE).is_err());
        assert!(Settings::from_inline_json("not json", BASE).is_err());
    }
}
