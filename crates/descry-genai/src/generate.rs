//! Generative model client: one-shot media description calls.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;

use crate::error::GenAiError;

/// HTTP client for the generative model endpoint.
pub struct GenerativeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerativeClient {
    /// Create a new client for `model` against `base_url`.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Ask the model to describe the referenced remote file.
    ///
    /// The request content is an ordered two-part sequence: the literal
    /// prompt followed by the file reference. Returns the text of the first
    /// candidate.
    pub async fn describe_file(
        &self,
        prompt: &str,
        file_uri: &str,
        mime_type: &str,
    ) -> Result<String, GenAiError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "file_data": { "file_uri": file_uri, "mime_type": mime_type } }
                ]
            }]
        });

        debug!(model = %self.model, mime_type, "sending description request");

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let json: Value = resp.json().await?;

        if !status.is_success() {
            let msg = json
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(GenAiError::Inference(format!("{status}: {msg}")));
        }

        let text = candidate_text(&json);
        if text.is_empty() {
            return Err(GenAiError::Inference("response contained no text".into()));
        }
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(resp: &Value) -> String {
    resp.pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}
