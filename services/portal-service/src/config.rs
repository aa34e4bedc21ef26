use anyhow::{Context, Result, anyhow};
use lp_api_types::{AccountAddress, Commitment};
use lp_crypto::BaseAccountKeypair;
use lp_program_client::ClusterConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

pub(crate) enum KeypairSource {
    File(PathBuf),
    Inline(String),
    Ephemeral,
}

pub(crate) struct ServiceConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cluster: ClusterConfig,
    pub(crate) program_id: AccountAddress,
    pub(crate) keypair_source: KeypairSource,
    pub(crate) allowed_origin: Option<String>,
}

impl ServiceConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let bind_addr = var("PORTAL_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .context("PORTAL_BIND_ADDR is not a socket address")?;

        let moniker = var("PORTAL_CLUSTER").unwrap_or_else(|| "devnet".to_owned());
        let cluster = ClusterConfig::from_moniker(&moniker)
            .ok_or_else(|| anyhow!("PORTAL_CLUSTER {moniker:?} is neither a known cluster nor a URL"))?;

        let commitment = match var("PORTAL_COMMITMENT") {
            Some(raw) => Commitment::parse(&raw)
                .ok_or_else(|| anyhow!("PORTAL_COMMITMENT {raw:?} is not processed, confirmed or finalized"))?,
            None => Commitment::default(),
        };

        let program_id = var("PORTAL_PROGRAM_ID").ok_or_else(|| anyhow!("PORTAL_PROGRAM_ID is required"))?;
        let program_id = AccountAddress::parse(&program_id).context("PORTAL_PROGRAM_ID")?;

        let keypair_source = if let Some(path) = var("PORTAL_BASE_ACCOUNT_KEYPAIR") {
            KeypairSource::File(PathBuf::from(path))
        } else if let Some(raw) = var("PORTAL_BASE_ACCOUNT_KEYPAIR_JSON") {
            KeypairSource::Inline(raw)
        } else {
            KeypairSource::Ephemeral
        };

        Ok(Self {
            bind_addr,
            cluster: cluster.with_commitment(commitment),
            program_id,
            keypair_source,
            allowed_origin: var("PORTAL_ALLOWED_ORIGIN"),
        })
    }

    pub(crate) fn load_keypair(&self) -> Result<BaseAccountKeypair> {
        match &self.keypair_source {
            KeypairSource::File(path) => BaseAccountKeypair::from_file(path),
            KeypairSource::Inline(raw) => {
                BaseAccountKeypair::from_json(raw).context("PORTAL_BASE_ACCOUNT_KEYPAIR_JSON")
            }
            KeypairSource::Ephemeral => {
                warn!("no storage account keypair configured; generated an ephemeral one, entries will not survive a restart");
                Ok(BaseAccountKeypair::new_random())
            }
        }
    }
}
