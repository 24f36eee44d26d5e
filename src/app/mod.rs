// HTTP surface: routes, handlers and wiring of the marketplace from config.

pub mod bootstrap;
pub mod error;
pub mod extract;
pub mod handlers;

use crate::core::marketplace::Marketplace;
use crate::core::{PaymentGateway, Verifier};
use crate::utils::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router<V, P>(market: Arc<Marketplace<V, P>>, max_upload_bytes: usize) -> Router
where
    V: Verifier + 'static,
    P: PaymentGateway + 'static,
{
    Router::new()
        .route("/api/jobs", get(handlers::list_jobs::<V, P>))
        .route("/api/submit", post(handlers::submit::<V, P>))
        .route("/api/pool", get(handlers::pool::<V, P>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(market)
}

/// Serves until `shutdown` resolves.
pub async fn serve<V, P, F>(
    listener: TcpListener,
    market: Arc<Marketplace<V, P>>,
    max_upload_bytes: usize,
    shutdown: F,
) -> Result<()>
where
    V: Verifier + 'static,
    P: PaymentGateway + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(market, max_upload_bytes);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
