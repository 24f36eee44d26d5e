use crate::adapters::solana::pubkey::Pubkey;
use crate::utils::error::{MarketError, Result};
use ed25519_dalek::{Signer, SigningKey};

pub const KEYPAIR_BYTES: usize = 64;

/// The custodial pool wallet.
pub struct PoolKeypair {
    signing_key: SigningKey,
}

impl PoolKeypair {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// Parses the 64-byte secret key (seed followed by public key) in any of the
    /// formats wallets export it as: a JSON byte array, a comma-separated byte
    /// list, or a base58 string.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let bytes = if text.starts_with('[') {
            serde_json::from_str::<Vec<u8>>(text).map_err(|e| MarketError::KeypairError {
                message: format!("invalid JSON byte array: {}", e),
            })?
        } else if text.contains(',') {
            text.split(',')
                .map(|n| n.trim().parse::<u8>())
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|e| MarketError::KeypairError {
                    message: format!("invalid byte list: {}", e),
                })?
        } else {
            bs58::decode(text)
                .into_vec()
                .map_err(|e| MarketError::KeypairError {
                    message: format!("invalid base58: {}", e),
                })?
        };

        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; KEYPAIR_BYTES] =
            bytes.try_into().map_err(|_| MarketError::KeypairError {
                message: format!("expected {} bytes, got {}", KEYPAIR_BYTES, bytes.len()),
            })?;

        // 公鑰必須與私鑰一致
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|e| MarketError::KeypairError {
                message: format!("public key does not match secret key: {}", e),
            })?;

        Ok(Self { signing_key })
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for PoolKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolKeypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}
