//! Gemini client
//!
//! Calls `generateContent` on the Google AI Studio API and reduces the reply
//! to its text.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{headers::build_goog_headers, logging::RelayContext, post_json, require_key},
};

/// Generate request accepted by the Gemini relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiGenerateRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub prompt: String,
    /// Prior turns, already in Gemini `{role, parts}` form
    #[serde(default)]
    pub history: Option<Vec<Value>>,
    /// Accepted for client compatibility; not sent upstream.
    #[serde(default)]
    pub files: Option<Value>,
}

/// Gemini relay response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiTextResponse {
    pub text: String,
}

/// Prior history followed by a single user turn holding the prompt
pub fn build_contents(history: Option<&[Value]>, prompt: &str) -> Vec<Value> {
    let mut contents: Vec<Value> = history.map(<[Value]>::to_vec).unwrap_or_default();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": prompt }]
    }));
    contents
}

/// Concatenated text parts of the first candidate
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            default_model: config.gemini_default_model.clone(),
        }
    }

    /// Requested model, or the configured fallback when none was given
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        let model = requested
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.default_model.as_str());
        model.strip_prefix("models/").unwrap_or(model).to_string()
    }

    /// Run `generateContent` and return the response text
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, model = %model))]
    pub async fn generate_text(
        &self,
        model: &str,
        contents: Vec<Value>,
        ctx: &RelayContext,
    ) -> AppResult<String> {
        let api_key = require_key(&self.api_key, "GEMINI_API_KEY")?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = post_json(
            &self.client,
            ctx,
            &url,
            build_goog_headers(api_key)?,
            &json!({ "contents": contents }),
        )
        .await?;

        let body: Value = response.json().await?;
        let text = extract_text(&body).ok_or_else(|| {
            debug!(body = %body, "Gemini response has no text");
            AppError::Internal(anyhow::anyhow!("Gemini response contained no text"))
        })?;

        Ok(text)
    }
}
