//! Generative Language API backend.

use super::{GenerativeBackend, GenerateRequest};
use crate::pool::Credential;
use async_trait::async_trait;
use std::time::Duration;
use studyforge_core::{StudyError, StudyResult};

/// Default base URL for the hosted Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for the `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client against the given base URL with a per-call timeout.
    ///
    /// The timeout bounds individual call latency; the dispatcher only
    /// bounds the retry count.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StudyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudyError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn build_body(&self, request: &GenerateRequest) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "temperature": request.options.temperature,
            "maxOutputTokens": request.options.max_output_tokens,
        });
        if request.options.json_output {
            generation_config["responseMimeType"] = serde_json::json!("application/json");
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "systemInstruction": {
                "parts": [{ "text": request.system }]
            },
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateRequest,
    ) -> StudyResult<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = self.build_body(request);

        let resp = self
            .http
            .post(&url)
            .query(&[("key", credential.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| StudyError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| StudyError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(StudyError::Backend {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let parsed: serde_json::Value = serde_json::from_str(&text)?;
        Ok(extract_text(&parsed))
    }
}

/// Pulls `error.message` out of an error body, falling back to the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(ToString::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Concatenates the part texts of the first candidate. A response without
/// candidates or parts (e.g. a safety block) yields an empty string; the
/// post-processor substitutes the default text.
fn extract_text(body: &serde_json::Value) -> String {
    let mut out = String::new();
    if let Some(parts) = body["candidates"][0]["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                out.push_str(text);
            }
        }
    }
    out
}
