use crate::domain::model::{Evidence, Job, PoolInfo, Verdict};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Judges whether a submission completes a job.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, job: &Job, evidence: &Evidence<'_>) -> Result<Verdict>;
}

/// Pays rewards out of the pool wallet.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Sends `amount` (whole native-token units) to `recipient`.
    ///
    /// Once the transfer is broadcast its signature is returned, even if
    /// confirmation later fails or times out. An error means no signature was
    /// obtained.
    async fn pay(&self, recipient: &str, amount: f64) -> Result<String>;

    async fn pool_info(&self) -> Result<PoolInfo>;
}
