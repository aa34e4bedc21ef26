use lp_api_types::{AccountAddress, Commitment, InvalidAddress, PortalConfigResponse};

pub const DEVNET_URL: &str = "https://api.devnet.solana.com";
pub const TESTNET_URL: &str = "https://api.testnet.solana.com";
pub const MAINNET_BETA_URL: &str = "https://api.mainnet-beta.solana.com";
pub const LOCALNET_URL: &str = "http://127.0.0.1:8899";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub endpoint: String,
    pub commitment: Commitment,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

impl ClusterConfig {
    pub fn devnet() -> Self {
        Self {
            endpoint: DEVNET_URL.to_owned(),
            commitment: Commitment::default(),
        }
    }

    /// Resolve a cluster moniker (`devnet`, `testnet`, `mainnet-beta`,
    /// `localnet`) or pass an explicit http(s) URL through.
    pub fn from_moniker(value: &str) -> Option<Self> {
        let value = value.trim();
        let endpoint = match value {
            "devnet" => DEVNET_URL.to_owned(),
            "testnet" => TESTNET_URL.to_owned(),
            "mainnet-beta" | "mainnet" => MAINNET_BETA_URL.to_owned(),
            "localnet" | "localhost" => LOCALNET_URL.to_owned(),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_owned()
            }
            _ => return None,
        };
        Some(Self {
            endpoint,
            commitment: Commitment::default(),
        })
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }
}

/// Everything a call against the link program needs besides the wallet
/// session. Built once at start-up and handed to `ProgramClient::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    pub cluster: ClusterConfig,
    pub program_id: AccountAddress,
    pub storage_account: AccountAddress,
}

impl TryFrom<&PortalConfigResponse> for ProgramConfig {
    type Error = InvalidAddress;

    fn try_from(response: &PortalConfigResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            cluster: ClusterConfig {
                endpoint: response.cluster_url.trim_end_matches('/').to_owned(),
                commitment: response.commitment,
            },
            program_id: AccountAddress::parse(&response.program_id)?,
            storage_account: AccountAddress::parse(&response.storage_account)?,
        })
    }
}
