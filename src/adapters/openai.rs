use crate::core::{Evidence, Job, Verdict, Verifier};
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 200;

const SYSTEM_PROMPT: &str = "You are a task verification AI for AIployer, a platform where people complete crypto-related tasks for payment.

Analyze submissions fairly but thoroughly. Approve good-faith efforts that meet the core requirements. Reject low-effort or off-topic submissions.

Respond with JSON: { \"approved\": true/false, \"reason\": \"brief explanation (1-2 sentences)\" }";

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Asks an OpenAI-compatible chat completions endpoint to judge a submission.
pub struct OpenAiVerifier {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiVerifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, job: &Job, evidence: &Evidence<'_>) -> Value {
        let prompt = format!(
            "Task: {}\nDescription: {}\nVerification criteria: {}\n\nWorker's notes: {}\n\nDoes this submission complete the task?",
            job.title,
            job.description,
            job.verification_prompt,
            evidence.notes.unwrap_or("none"),
        );
        let image_url = format!(
            "data:{};base64,{}",
            evidence.image.mime_type,
            general_purpose::STANDARD.encode(&evidence.image.bytes)
        );

        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        { "type": "image_url", "image_url": { "url": image_url } }
                    ]
                }
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": self.max_tokens,
        })
    }
}

#[async_trait]
impl Verifier for OpenAiVerifier {
    async fn verify(&self, job: &Job, evidence: &Evidence<'_>) -> Result<Verdict> {
        let url = format!("{}/chat/completions", self.api_base);
        tracing::debug!("Making verification request to: {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(job, evidence))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Verification response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::VerificationError {
                message: format!("model endpoint returned {}: {}", status, body),
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MarketError::VerificationError {
                message: "model returned no content".to_string(),
            })?;

        serde_json::from_str(&content).map_err(|e| MarketError::VerificationError {
            message: format!("model returned malformed verdict ({}): {}", e, content),
        })
    }
}
