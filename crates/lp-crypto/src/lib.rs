use anyhow::{Context, Result, anyhow};
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, VerifyingKey};
use lp_api_types::AccountAddress;
use rand::rngs::OsRng;
use serde_json::Value;
use std::path::Path;
use zeroize::Zeroizing;

pub trait Signer: Send + Sync {
    fn address(&self) -> AccountAddress;
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// Keypair of the storage account. Its public key is the account address the
/// program initialises; the secret only ever lives in the service process.
pub struct BaseAccountKeypair {
    signing_key: SigningKey,
}

impl BaseAccountKeypair {
    pub fn new_random() -> Self {
        let mut rng = OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// 64 bytes: 32-byte secret followed by the 32-byte public key.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; 64] = bytes
            .try_into()
            .map_err(|_| anyhow!("keypair must be 64 bytes, got {}", bytes.len()))?;
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|err| anyhow!("keypair public half does not match secret: {err}"))?;
        Ok(Self { signing_key })
    }

    /// Accepts a bare JSON array of 64 bytes, or the serialized keypair
    /// object shape `{"_keypair": {"secretKey": {"0": .., "1": ..}}}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("keypair is not valid JSON")?;
        let bytes = Zeroizing::new(keypair_bytes_from_json(&value)?);
        Self::from_keypair_bytes(&bytes)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = Zeroizing::new(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading keypair file {}", path.display()))?,
        );
        Self::from_json(&raw)
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn to_json_array(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.signing_key.to_keypair_bytes());
        let parts: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
        Zeroizing::new(format!("[{}]", parts.join(",")))
    }
}

impl Signer for BaseAccountKeypair {
    fn address(&self) -> AccountAddress {
        AccountAddress::from_bytes(&self.public_key_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        if message.is_empty() {
            return Err(anyhow!("message cannot be empty"));
        }
        let signature: Signature = self.signing_key.sign(message);
        Ok(signature.to_bytes().to_vec())
    }
}

pub fn verify(address: &AccountAddress, message: &[u8], signature: &[u8]) -> Result<()> {
    let public = address.to_bytes()?;
    let key = VerifyingKey::from_bytes(&public).map_err(|err| anyhow!("bad public key: {err}"))?;
    let signature =
        Signature::from_slice(signature).map_err(|err| anyhow!("bad signature encoding: {err}"))?;
    key.verify_strict(message, &signature)
        .map_err(|err| anyhow!("signature does not verify: {err}"))
}

fn keypair_bytes_from_json(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Array(items) => items.iter().map(json_byte).collect(),
        Value::Object(map) => {
            let secret = map
                .get("_keypair")
                .and_then(|inner| inner.get("secretKey"))
                .or_else(|| map.get("secretKey"))
                .ok_or_else(|| anyhow!("keypair object has no secretKey"))?;
            match secret {
                Value::Array(_) => keypair_bytes_from_json(secret),
                Value::Object(indexed) => {
                    let mut bytes = vec![0_u8; indexed.len()];
                    for (key, byte) in indexed {
                        let index: usize = key
                            .parse()
                            .with_context(|| format!("secretKey index {key:?} is not a number"))?;
                        let slot = bytes
                            .get_mut(index)
                            .ok_or_else(|| anyhow!("secretKey index {index} out of range"))?;
                        *slot = json_byte(byte)?;
                    }
                    Ok(bytes)
                }
                _ => Err(anyhow!("secretKey must be an array or an indexed object")),
            }
        }
        _ => Err(anyhow!("unsupported keypair format")),
    }
}

fn json_byte(value: &Value) -> Result<u8> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| anyhow!("keypair byte out of range: {value}"))
}
