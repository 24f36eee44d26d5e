use crate::app::error::ApiError;
use crate::app::extract::SubmissionForm;
use crate::core::marketplace::Marketplace;
use crate::core::{JobSummary, PaymentGateway, PoolInfo, SubmitResponse, Verifier};
use axum::{extract::State, response::Json};
use std::sync::Arc;

pub async fn list_jobs<V, P>(State(market): State<Arc<Marketplace<V, P>>>) -> Json<Vec<JobSummary>>
where
    V: Verifier,
    P: PaymentGateway,
{
    Json(market.jobs())
}

pub async fn submit<V, P>(
    State(market): State<Arc<Marketplace<V, P>>>,
    SubmissionForm(submission): SubmissionForm,
) -> Result<Json<SubmitResponse>, ApiError>
where
    V: Verifier,
    P: PaymentGateway,
{
    market
        .submit(submission)
        .await
        .map(Json)
        .map_err(ApiError::from_submit_error)
}

pub async fn pool<V, P>(
    State(market): State<Arc<Marketplace<V, P>>>,
) -> Result<Json<PoolInfo>, ApiError>
where
    V: Verifier,
    P: PaymentGateway,
{
    market
        .pool_info()
        .await
        .map(Json)
        .map_err(ApiError::from_pool_error)
}
