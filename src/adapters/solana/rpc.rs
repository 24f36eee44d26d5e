use crate::utils::error::{MarketError, Result};
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
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
}

impl FromStr for Commitment {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(MarketError::InvalidConfigValueError {
                field: "solana.commitment".to_string(),
                value: other.to_string(),
                reason: "Expected one of: processed, confirmed, finalized".to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub confirmation_status: Option<Commitment>,
    pub err: Option<Value>,
}

/// Minimal JSON-RPC client for a Solana node.
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Bounds every RPC round trip. Confirmation polling has its own
    /// overall timeout on top of this.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!("📡 RPC {} (id {}) -> {}", method, id, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse<T> = response.json().await?;
        if let Some(error) = body.error {
            return Err(MarketError::RpcError {
                code: error.code,
                message: error.message,
            });
        }
        body.result.ok_or_else(|| MarketError::RpcError {
            code: 0,
            message: format!("{} returned no result", method),
        })
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, address: &str, commitment: Commitment) -> Result<u64> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address, { "commitment": commitment.as_str() }]),
            )
            .await?;
        Ok(response.value)
    }

    pub async fn get_latest_blockhash(&self, commitment: Commitment) -> Result<LatestBlockhash> {
        let response: WithContext<LatestBlockhash> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": commitment.as_str() }]),
            )
            .await?;
        Ok(response.value)
    }

    /// Submits a serialized transaction and returns its signature.
    pub async fn send_transaction(&self, wire: &[u8], commitment: Commitment) -> Result<String> {
        let encoded = general_purpose::STANDARD.encode(wire);
        self.call(
            "sendTransaction",
            json!([encoded, {
                "encoding": "base64",
                "preflightCommitment": commitment.as_str(),
            }]),
        )
        .await
    }

    pub async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let response: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(response.value.into_iter().next().flatten())
    }

    /// Polls until `signature` reaches `commitment`, fails on chain, or
    /// `timeout` elapses.
    pub async fn confirm_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<()> {
        tokio::time::timeout(
            timeout,
            self.poll_signature(signature, commitment, poll_interval),
        )
        .await
        .map_err(|_| MarketError::ConfirmationTimeout {
            signature: signature.to_string(),
        })?
    }

    async fn poll_signature(
        &self,
        signature: &str,
        commitment: Commitment,
        poll_interval: Duration,
    ) -> Result<()> {
        loop {
            if let Some(status) = self.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(MarketError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status
                    .confirmation_status
                    .is_some_and(|reached| reached >= commitment)
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

pub fn decode_blockhash(blockhash: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(blockhash)
        .into_vec()
        .map_err(|e| MarketError::RpcError {
            code: 0,
            message: format!("invalid blockhash '{}': {}", blockhash, e),
        })?;
    bytes.try_into().map_err(|_| MarketError::RpcError {
        code: 0,
        message: format!("blockhash '{}' is not 32 bytes", blockhash),
    })
}
