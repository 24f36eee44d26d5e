pub mod catalog;
pub mod marketplace;

pub use crate::domain::model::{
    Difficulty, Evidence, Job, JobSummary, PoolInfo, ProofImage, Submission, SubmitResponse,
    Verdict, DEMO_MODE_REASON,
};
pub use crate::domain::ports::{PaymentGateway, Verifier};
pub use crate::utils::error::Result;
