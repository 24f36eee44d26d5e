use crate::app::error::ApiError;
use crate::core::{ProofImage, Submission};
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

/// A submission read from a multipart form or from a JSON body.
///
/// JSON bodies carry no image. Rejections always use the `{"error": ...}`
/// body.
pub struct SubmissionForm(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(body) = Json::<JsonSubmission>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    tracing::warn!("⚠️ Rejected JSON body: {}", rejection.body_text());
                    ApiError::new(rejection.status(), rejection.body_text())
                })?;
            return Ok(Self(body.into()));
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("⚠️ Rejected multipart body: {}", rejection.body_text());
                ApiError::new(rejection.status(), rejection.body_text())
            })?;
        read_multipart(multipart).await.map(Self)
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonSubmission {
    job_id: Option<Value>,
    wallet: Option<Value>,
    proof_text: Option<Value>,
}

impl From<JsonSubmission> for Submission {
    fn from(body: JsonSubmission) -> Self {
        Submission {
            job_id: text_value(body.job_id),
            wallet: text_value(body.wallet),
            proof_text: text_value(body.proof_text),
            image: None,
        }
    }
}

// 數字形式的 jobId 也接受
fn text_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Collects the `jobId`, `wallet`, `proofText` and `image` form fields.
/// Unknown fields are skipped.
async fn read_multipart(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jobId" => submission.job_id = Some(field.text().await.map_err(multipart_error)?),
            "wallet" => submission.wallet = Some(field.text().await.map_err(multipart_error)?),
            "proofText" => {
                submission.proof_text = Some(field.text().await.map_err(multipart_error)?)
            }
            "image" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // 瀏覽器未選檔案時會送出空的 part
                if !bytes.is_empty() {
                    submission.image = Some(ProofImage {
                        bytes: bytes.to_vec(),
                        mime_type,
                    });
                }
            }
            other => tracing::debug!("Ignoring unexpected form field: {}", other),
        }
    }

    Ok(submission)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::warn!("⚠️ Rejected multipart body: {}", err);
    ApiError::new(err.status(), err.body_text())
}
