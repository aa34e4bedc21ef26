use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Public identifier handed out by the browser wallet on connect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Base58 encoded 32-byte ledger address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid account address: {0}")]
pub struct InvalidAddress(pub String);

impl AccountAddress {
    pub const LEN: usize = 32;

    pub fn parse(value: &str) -> Result<Self, InvalidAddress> {
        let trimmed = value.trim();
        let decoded = bs58::decode(trimmed)
            .into_vec()
            .map_err(|_| InvalidAddress(trimmed.to_owned()))?;
        if decoded.len() != Self::LEN {
            return Err(InvalidAddress(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn to_bytes(&self) -> Result<[u8; 32], InvalidAddress> {
        let mut out = [0_u8; 32];
        let written = bs58::decode(&self.0)
            .onto(&mut out)
            .map_err(|_| InvalidAddress(self.0.clone()))?;
        if written != Self::LEN {
            return Err(InvalidAddress(self.0.clone()));
        }
        Ok(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ledger's built-in account allocation program.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// One submitted link and the wallet that submitted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub submitter: WalletAddress,
    pub link: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "processed" => Some(Commitment::Processed),
            "confirmed" => Some(Commitment::Confirmed),
            "finalized" => Some(Commitment::Finalized),
            _ => None,
        }
    }
}

// ── portal-service wire types ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalConfigResponse {
    pub cluster_url: String,
    #[serde(default)]
    pub commitment: Commitment,
    pub program_id: String,
    pub storage_account: String,
    #[serde(default)]
    pub co_signer_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAccountSignRequest {
    /// Base64 encoded message bytes.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAccountSignResponse {
    pub public_key: String,
    /// Base64 encoded ed25519 signature.
    pub signature: String,
}
