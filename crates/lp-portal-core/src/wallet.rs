use async_trait::async_trait;
use lp_api_types::WalletAddress;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Solana object not found! Install a Solana wallet such as Phantom.")]
    ProviderMissing,
    #[error("wallet connection rejected: {0}")]
    Rejected(String),
    #[error("wallet returned no usable public key: {0}")]
    Malformed(String),
}

/// The wallet agent injected into the page.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn is_present(&self) -> bool;
    /// Whether the provider advertises itself as a wallet that supports
    /// trusted reconnects.
    fn self_identifies(&self) -> bool;
    async fn connect(&self, trusted_only: bool) -> Result<WalletAddress, WalletError>;
}

pub struct WalletBridge<P> {
    provider: P,
}

impl<P> WalletBridge<P>
where
    P: WalletProvider,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Reconnect without prompting if the user trusted this site before.
    /// Every failure collapses to `None`.
    pub async fn silent_connect(&self) -> Option<WalletAddress> {
        if !self.provider.is_present() {
            debug!("no wallet provider injected, skipping silent connect");
            return None;
        }
        if !self.provider.self_identifies() {
            debug!("wallet provider does not support trusted reconnect");
            return None;
        }

        info!("wallet provider found");
        match self.provider.connect(true).await {
            Ok(address) => {
                info!("connected with public key: {}", address);
                Some(address)
            }
            Err(err) => {
                warn!("silent connect failed: {}", err);
                None
            }
        }
    }

    pub async fn connect(&self) -> Result<WalletAddress, WalletError> {
        if !self.provider.is_present() {
            return Err(WalletError::ProviderMissing);
        }

        let address = self.provider.connect(false).await?;
        info!("connected with public key: {}", address);
        Ok(address)
    }
}
