use crate::core::catalog::Catalog;
use crate::core::{Evidence, JobSummary, PaymentGateway, PoolInfo, Submission, SubmitResponse, Verdict, Verifier};
use crate::utils::error::{MarketError, Result};

/// Submission handler: look up the job, verify the proof, pay the reward.
///
/// Either adapter may be absent. Without a verifier (or without an image) every
/// submission is approved in demo mode; without a payment gateway approved
/// submissions are simply not paid.
pub struct Marketplace<V: Verifier, P: PaymentGateway> {
    catalog: Catalog,
    verifier: Option<V>,
    payments: Option<P>,
}

impl<V: Verifier, P: PaymentGateway> Marketplace<V, P> {
    pub fn new(catalog: Catalog, verifier: Option<V>, payments: Option<P>) -> Self {
        Self {
            catalog,
            verifier,
            payments,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn verification_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    pub fn payments_enabled(&self) -> bool {
        self.payments.is_some()
    }

    pub fn jobs(&self) -> Vec<JobSummary> {
        self.catalog.summaries()
    }

    pub async fn submit(&self, submission: Submission) -> Result<SubmitResponse> {
        let (job_id, wallet) = match (
            non_empty(submission.job_id.as_deref()),
            non_empty(submission.wallet.as_deref()),
        ) {
            (Some(job_id), Some(wallet)) => (job_id, wallet),
            _ => return Err(MarketError::MissingFields),
        };

        let job = self
            .catalog
            .resolve(job_id)
            .ok_or_else(|| MarketError::UnknownJob {
                raw: job_id.to_string(),
            })?;

        let notes = non_empty(submission.proof_text.as_deref());
        tracing::info!("📥 Submission for: \"{}\"", job.title);
        tracing::info!("   Wallet: {}", wallet);
        tracing::info!("   Has image: {}", submission.image.is_some());
        tracing::info!("   Notes: {}", notes.unwrap_or("none"));

        let verdict = match (&self.verifier, &submission.image) {
            (Some(verifier), Some(image)) => {
                tracing::info!("🤖 AI verification in progress...");
                let evidence = Evidence { notes, image };
                let verdict = verifier.verify(job, &evidence).await?;
                tracing::info!(
                    "   Verdict: {}",
                    if verdict.approved { "APPROVED" } else { "REJECTED" }
                );
                tracing::info!("   Reason: {}", verdict.reason);
                verdict
            }
            _ => Verdict::demo_mode(),
        };

        let mut tx_signature = None;
        if verdict.approved {
            if let Some(payments) = &self.payments {
                tracing::info!("💸 Sending {} SOL to {}...", job.reward, wallet);
                match payments.pay(wallet, job.reward).await {
                    Ok(signature) => {
                        tracing::info!("✅ Payment sent! Tx: {}", signature);
                        tx_signature = Some(signature);
                    }
                    Err(e) => {
                        // 付款失敗不影響審核結果
                        tracing::error!("❌ Payment failed: {}", e);
                        tracing::debug!("💡 {}", e.recovery_suggestion());
                    }
                }
            }
        }

        Ok(SubmitResponse {
            success: true,
            approved: verdict.approved,
            reward: if verdict.approved { job.reward } else { 0.0 },
            reason: verdict.reason,
            tx_signature,
        })
    }

    pub async fn pool_info(&self) -> Result<PoolInfo> {
        match &self.payments {
            Some(payments) => payments.pool_info().await,
            None => Ok(PoolInfo::not_configured()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
