use crate::adapters::solana::keypair::PoolKeypair;
use crate::adapters::solana::pubkey::Pubkey;
use crate::adapters::solana::rpc::{decode_blockhash, Commitment, RpcClient};
use crate::adapters::solana::transaction::{Message, Transaction};
use crate::adapters::solana::{lamports_to_sol, sol_to_lamports};
use crate::core::{PaymentGateway, PoolInfo};
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Pays rewards with native SOL transfers signed by the pool keypair.
pub struct SolanaPayout {
    rpc: RpcClient,
    keypair: PoolKeypair,
    commitment: Commitment,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl SolanaPayout {
    pub fn new(rpc: RpcClient, keypair: PoolKeypair) -> Self {
        Self {
            rpc,
            keypair,
            commitment: Commitment::Confirmed,
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_confirmation(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn pool_address(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl PaymentGateway for SolanaPayout {
    async fn pay(&self, recipient: &str, amount: f64) -> Result<String> {
        let to: Pubkey = recipient.parse()?;
        let lamports = sol_to_lamports(amount);
        if lamports == 0 {
            return Err(MarketError::InvalidConfigValueError {
                field: "reward".to_string(),
                value: amount.to_string(),
                reason: "Reward rounds down to zero lamports".to_string(),
            });
        }

        let latest = self.rpc.get_latest_blockhash(self.commitment).await?;
        let blockhash = decode_blockhash(&latest.blockhash)?;
        tracing::debug!(
            "🔗 Using blockhash {} (valid until height {})",
            latest.blockhash,
            latest.last_valid_block_height
        );

        let message = Message::system_transfer(&self.pool_address(), &to, lamports, blockhash);
        let tx = Transaction::new_signed(message, &self.keypair);

        let signature = self
            .rpc
            .send_transaction(&tx.serialize(), self.commitment)
            .await?;
        tracing::debug!("📨 Transaction submitted: {}", signature);

        // 交易已廣播，確認失敗仍回傳簽章，避免重複提交造成重複付款
        if let Err(e) = self
            .rpc
            .confirm_transaction(
                &signature,
                self.commitment,
                self.confirm_timeout,
                self.poll_interval,
            )
            .await
        {
            tracing::warn!("⚠️ Transaction {} not confirmed: {}", signature, e);
            tracing::warn!("💡 {}", e.recovery_suggestion());
        }

        Ok(signature)
    }

    async fn pool_info(&self) -> Result<PoolInfo> {
        let address = self.pool_address().to_string();
        let lamports = self.rpc.get_balance(&address, self.commitment).await?;
        Ok(PoolInfo {
            address,
            balance: lamports_to_sol(lamports),
        })
    }
}
