use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A task definition. `verification_prompt` is the rubric handed to the verifier
/// and never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub reward: f64,
    pub difficulty: Difficulty,
    #[serde(alias = "time_estimate")]
    pub time_estimate: String,
    #[serde(alias = "verification_prompt")]
    pub verification_prompt: String,
}

/// Public view of a [`Job`] served by `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub reward: f64,
    pub difficulty: Difficulty,
    pub time_estimate: String,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            reward: job.reward,
            difficulty: job.difficulty,
            time_estimate: job.time_estimate.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProofImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Raw form fields as received; nothing is validated yet.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub job_id: Option<String>,
    pub wallet: Option<String>,
    pub proof_text: Option<String>,
    pub image: Option<ProofImage>,
}

/// What the verifier gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub notes: Option<&'a str>,
    pub image: &'a ProofImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub approved: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: String,
}

// 模型輸出不一定是正確型別：null、字串、數字都要能讀
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(approved) => approved,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

pub const DEMO_MODE_REASON: &str = "Auto-approved (demo mode - AI verification not configured)";

impl Verdict {
    pub fn demo_mode() -> Self {
        Self {
            approved: true,
            reason: DEMO_MODE_REASON.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub approved: bool,
    pub reason: String,
    pub reward: f64,
    pub tx_signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub address: String,
    pub balance: f64,
}

impl PoolInfo {
    pub fn not_configured() -> Self {
        Self {
            address: "Not configured".to_string(),
            balance: 0.0,
        }
    }
}
