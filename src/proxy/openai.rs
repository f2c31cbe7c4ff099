//! OpenAI client
//!
//! Synchronous (non-streaming) chat completions against the OpenAI API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{
    config::Config,
    error::AppResult,
    proxy::{headers::build_bearer_headers, logging::RelayContext, post_json, require_key},
};

/// Chat request accepted by the OpenAI relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<Value>,
}

/// OpenAI API client
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAIClient {
    /// Create a new OpenAI client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
        }
    }

    /// Create a chat completion and return the completion object as sent by OpenAI
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &OpenAIChatRequest,
        ctx: &RelayContext,
    ) -> AppResult<Value> {
        let api_key = require_key(&self.api_key, "OPENAI_API_KEY")?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = post_json(
            &self.client,
            ctx,
            &url,
            build_bearer_headers(api_key)?,
            request,
        )
        .await?;

        Ok(response.json().await?)
    }
}
