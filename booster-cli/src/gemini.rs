//! Gemini analysis provider
//!
//! Calls the Generative Language REST API:
//!
//! ```text
//! POST {endpoint}/models/{model}:generateContent
//! x-goog-api-key: <api key>
//! ```
//!
//! The key only travels in the header, and request URLs are stripped from
//! transport errors before they are reported or logged.
//!
//! The request asks for a JSON response matching the analysis schema
//! (`summary`, `recommendations`, `careerPath`); the model's answer is read
//! from `candidates[0].content.parts[0].text`.

use std::time::Duration;

use async_trait::async_trait;
use booster_core::{AnalysisProvider, AnalysisResult, ProviderConfig, ProviderError, ScoreEntry};
use serde_json::{json, Value};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Analysis provider backed by the Gemini API
pub struct GeminiProvider {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a provider with an explicit API key
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a provider from configuration, reading the key from the environment
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key().ok_or_else(|| {
            ProviderError::NotConfigured(format!("{} is not set", config.api_key_env))
        })?;
        Self::new(&config.endpoint, &config.model, api_key, config.timeout())
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(
        &self,
        entries: &[ScoreEntry],
        display_name: &str,
    ) -> Result<AnalysisResult, ProviderError> {
        let prompt = build_prompt(entries, display_name)?;

        tracing::debug!(model = %self.model, entries = entries.len(), "sending analysis request");

        let response = self
            .http_client
            .post(self.url())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request_body(&prompt))
            .send()
            .await
            .map_err(|e| classify_failure(None, &describe_transport_error(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| {
                ProviderError::Transport(format!(
                    "could not read response body: {}",
                    describe_transport_error(e)
                ))
            })?;

        if !(200..300).contains(&status) {
            return Err(classify_failure(Some(status), &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("response is not JSON: {}", e)))?;
        parse_response(&value)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Error text with the request URL removed and the cause chain appended
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut text = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Prompt naming the student and embedding their records as JSON
pub fn build_prompt(entries: &[ScoreEntry], display_name: &str) -> Result<String, ProviderError> {
    let scores = serde_json::to_string(entries)
        .map_err(|e| ProviderError::InvalidResponse(format!("could not encode records: {}", e)))?;

    Ok(format!(
        "Analyze the academic engineering performance of {display_name}.\n\
         Scores: {scores}\n\n\
         Evaluate technical proficiency in Lab work vs Theory.\n\
         Predict a potential career specialization (e.g. System Design, R&D, Operations).\n\
         Provide a professional, technical summary."
    ))
}

/// `generateContent` request body with a structured-output schema
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "Technical performance overview"
                    },
                    "recommendations": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Actionable engineering skills to improve"
                    },
                    "careerPath": {
                        "type": "STRING",
                        "description": "Likely engineering specialization"
                    }
                },
                "required": ["summary", "recommendations", "careerPath"]
            }
        }
    })
}

/// Extract the analysis from a `generateContent` response
pub fn parse_response(body: &Value) -> Result<AnalysisResult, ProviderError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProviderError::InvalidResponse("no text in candidates[0].content.parts[0]".to_string())
        })?;

    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ProviderError::InvalidResponse(format!("analysis does not match schema: {}", e)))
}

/// Models occasionally wrap JSON output in a markdown fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Map an HTTP status and/or error body to a provider error
///
/// HTTP 429, a `RESOURCE_EXHAUSTED` status or any message mentioning quota
/// count as quota exhaustion.
pub fn classify_failure(status: Option<u16>, body: &str) -> ProviderError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .or(status);
    let api_status = error
        .and_then(|e| e.get("status"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body)
        .trim()
        .to_string();

    let quota = code == Some(429)
        || api_status == "RESOURCE_EXHAUSTED"
        || message.to_lowercase().contains("quota");

    if quota {
        ProviderError::QuotaExhausted(message)
    } else {
        match status {
            Some(status) => ProviderError::Transport(format!("HTTP {}: {}", status, message)),
            None => ProviderError::Transport(message),
        }
    }
}
