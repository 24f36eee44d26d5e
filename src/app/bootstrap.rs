use crate::adapters::openai::OpenAiVerifier;
use crate::adapters::solana::{PoolKeypair, RpcClient, SolanaPayout};
use crate::config::AppConfig;
use crate::core::catalog::Catalog;
use crate::core::marketplace::Marketplace;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub type LiveMarketplace = Marketplace<OpenAiVerifier, SolanaPayout>;

/// Builds the marketplace the server runs with.
///
/// A missing API key or pool key disables the matching leg. An unreadable
/// pool key is logged and treated as missing rather than aborting startup.
pub fn build_marketplace(config: &AppConfig) -> Result<LiveMarketplace> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!("📁 Loading catalog from: {}", path);
            Catalog::from_file(path)?
        }
        None => Catalog::builtin(),
    };
    catalog.validate()?;

    let verifier = config
        .verifier
        .as_ref()
        .map(|v| {
            OpenAiVerifier::new(v.api_key.expose())
                .with_api_base(v.api_base.clone())
                .with_model(v.model.clone())
                .with_max_tokens(v.max_tokens)
                .with_timeout(v.timeout)
        })
        .transpose()?;
    if let Some(verifier) = &verifier {
        tracing::info!("🤖 Verifier model: {}", verifier.model());
    }

    let payments = match &config.solana.pool_private_key {
        Some(key) => match PoolKeypair::parse(key.expose()) {
            Ok(keypair) => {
                let rpc = RpcClient::new(config.solana.rpc_url.clone())
                    .with_timeout(config.solana.request_timeout)?;
                tracing::debug!("Solana RPC endpoint: {}", rpc.url());
                let payout = SolanaPayout::new(rpc, keypair)
                    .with_commitment(config.solana.commitment)
                    .with_confirmation(config.solana.confirm_timeout, config.solana.poll_interval);
                tracing::info!("🔑 Pool wallet loaded: {}", payout.pool_address());
                Some(payout)
            }
            Err(e) => {
                tracing::warn!("⚠️ Pool wallet not configured: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(Marketplace::new(catalog, verifier, payments))
}
