#![allow(dead_code)]

use aiployer::adapters::solana::{Commitment, PoolKeypair, RpcClient};
use aiployer::app;
use aiployer::core::{PaymentGateway, Verifier};
use aiployer::{Marketplace, OpenAiVerifier, SolanaPayout};
use ed25519_dalek::SigningKey;
use httpmock::prelude::*;
use httpmock::Mock;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Starts the API on an ephemeral port and returns its base URL.
pub async fn spawn_app<V, P>(market: Marketplace<V, P>, max_upload_bytes: usize) -> String
where
    V: Verifier + 'static,
    P: PaymentGateway + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(app::serve(
        listener,
        Arc::new(market),
        max_upload_bytes,
        std::future::pending(),
    ));
    format!("http://{}", addr)
}

pub fn pool_keypair() -> PoolKeypair {
    PoolKeypair::from_signing_key(SigningKey::from_bytes(&[21; 32]))
}

pub fn recipient() -> String {
    aiployer::adapters::solana::Pubkey::new([9; 32]).to_string()
}

pub fn solana_payout(server: &MockServer) -> SolanaPayout {
    SolanaPayout::new(RpcClient::new(server.url("/")), pool_keypair())
        .with_commitment(Commitment::Confirmed)
        .with_confirmation(Duration::from_secs(2), Duration::from_millis(10))
}

pub fn openai_verifier(server: &MockServer) -> OpenAiVerifier {
    OpenAiVerifier::new("test-key").with_api_base(server.url("/v1"))
}

pub fn mock_verdict<'a>(server: &'a MockServer, approved: bool, reason: &str) -> Mock<'a> {
    let content = serde_json::json!({ "approved": approved, "reason": reason }).to_string();
    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            }));
    })
}

fn rpc_result(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

pub struct TransferMocks<'a> {
    pub blockhash: Mock<'a>,
    pub send: Mock<'a>,
    pub status: Mock<'a>,
}

/// Mocks the three RPC calls a successful transfer makes.
pub fn mock_successful_transfer<'a>(server: &'a MockServer, signature: &str) -> TransferMocks<'a> {
    let blockhash = server.mock(|when, then| {
        when.method(POST).path("/").body_contains("getLatestBlockhash");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(rpc_result(serde_json::json!({
                "context": { "slot": 100 },
                "value": {
                    "blockhash": bs58::encode([4u8; 32]).into_string(),
                    "lastValidBlockHeight": 250
                }
            })));
    });

    let send = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .body_contains("sendTransaction")
            .body_contains("base64");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(rpc_result(serde_json::json!(signature)));
    });

    let status = server.mock(|when, then| {
        when.method(POST).path("/").body_contains("getSignatureStatuses");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(rpc_result(serde_json::json!({
                "context": { "slot": 101 },
                "value": [{
                    "slot": 101,
                    "confirmations": 1,
                    "err": null,
                    "confirmationStatus": "confirmed"
                }]
            })));
    });

    TransferMocks {
        blockhash,
        send,
        status,
    }
}

pub fn submission_form(job_id: &str, wallet: &str, notes: Option<&str>, image: Option<&[u8]>) -> Form {
    let mut form = Form::new().text("jobId", job_id.to_string()).text("wallet", wallet.to_string());
    if let Some(notes) = notes {
        form = form.text("proofText", notes.to_string());
    }
    if let Some(image) = image {
        let part = Part::bytes(image.to_vec())
            .file_name("proof.png")
            .mime_str("image/png")
            .unwrap();
        form = form.part("image", part);
    }
    form
}

pub async fn post_submission(base_url: &str, form: Form) -> (u16, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/submit", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}
