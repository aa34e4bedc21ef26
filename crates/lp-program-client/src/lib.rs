//! Client for the link program: configuration, the runtime seam and the
//! error taxonomy callers branch on.
//!
//! Transaction building, signing and account decoding belong to whatever
//! implements [`ProgramRuntime`]; this crate only decides what to ask for and
//! how to interpret the answer.

mod config;
mod error;

pub use config::{
    ClusterConfig, DEVNET_URL, LOCALNET_URL, MAINNET_BETA_URL, ProgramConfig, TESTNET_URL,
};
pub use error::ProgramError;

use async_trait::async_trait;
use lp_api_types::{AccountAddress, Commitment, Entry, SYSTEM_PROGRAM_ID, WalletAddress};
use tracing::{debug, info, warn};

/// Parameters of a single remote call. A fresh one is built for every call
/// because the wallet session may have changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub endpoint: String,
    pub commitment: Commitment,
    pub program_id: AccountAddress,
    pub storage_account: AccountAddress,
    pub system_program: AccountAddress,
    pub payer: WalletAddress,
}

#[async_trait(?Send)]
pub trait ProgramRuntime {
    /// Allocate and initialise the storage account, paid for by `ctx.payer`.
    async fn initialize(&self, ctx: &CallContext) -> Result<(), ProgramError>;
    async fn append(&self, ctx: &CallContext, link: &str) -> Result<(), ProgramError>;
    async fn fetch(&self, ctx: &CallContext) -> Result<Vec<Entry>, ProgramError>;
}

pub struct ProgramClient<R> {
    config: ProgramConfig,
    runtime: R,
}

impl<R> ProgramClient<R>
where
    R: ProgramRuntime,
{
    pub fn new(config: ProgramConfig, runtime: R) -> Self {
        Self { config, runtime }
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn context(&self, session: &WalletAddress) -> CallContext {
        CallContext {
            endpoint: self.config.cluster.endpoint.clone(),
            commitment: self.config.cluster.commitment,
            program_id: self.config.program_id.clone(),
            storage_account: self.config.storage_account.clone(),
            system_program: AccountAddress(SYSTEM_PROGRAM_ID.to_owned()),
            payer: session.clone(),
        }
    }

    pub async fn initialize_account(&self, session: &WalletAddress) -> Result<(), ProgramError> {
        let ctx = self.context(session);
        match self.runtime.initialize(&ctx).await {
            Ok(()) => {
                info!("created storage account {}", ctx.storage_account);
                Ok(())
            }
            Err(err) => {
                warn!("failed to create storage account {}: {}", ctx.storage_account, err);
                Err(err)
            }
        }
    }

    pub async fn append_entry(&self, session: &WalletAddress, link: &str) -> Result<(), ProgramError> {
        let link = link.trim();
        if link.is_empty() {
            debug!("empty link, nothing sent");
            return Err(ProgramError::EmptyLink);
        }

        let ctx = self.context(session);
        match self.runtime.append(&ctx, link).await {
            Ok(()) => {
                info!("link sent to program: {}", link);
                Ok(())
            }
            Err(err) => {
                warn!("failed to send link {}: {}", link, err);
                Err(err)
            }
        }
    }

    pub async fn fetch_entries(&self, session: &WalletAddress) -> Result<Vec<Entry>, ProgramError> {
        let ctx = self.context(session);
        match self.runtime.fetch(&ctx).await {
            Ok(entries) => {
                info!(
                    "got {} entries from storage account {}",
                    entries.len(),
                    ctx.storage_account
                );
                Ok(entries)
            }
            Err(err) if err.is_account_not_found() => {
                info!("storage account {} is not initialised yet", ctx.storage_account);
                Err(err)
            }
            Err(err) => {
                warn!("error while fetching entries: {}", err);
                Err(err)
            }
        }
    }
}
