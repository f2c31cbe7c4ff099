//! OpenRouter client
//!
//! Forwards chat completion requests to OpenRouter. Responses are handed back
//! untouched so the route can either buffer them or pipe the event stream.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{
    config::Config,
    error::AppResult,
    proxy::{
        headers::{build_bearer_headers, insert_optional},
        logging::RelayContext,
        post_json, require_key, ByteStream,
    },
};

/// Chat request accepted by the OpenRouter relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterChatRequest {
    pub model: String,
    pub messages: Vec<Value>,
    #[serde(default)]
    pub stream: bool,
}

/// OpenRouter API client
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    site_url: Option<String>,
    app_name: Option<String>,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openrouter_api_url.trim_end_matches('/').to_string(),
            api_key: config.openrouter_api_key.clone(),
            site_url: config.openrouter_site_url.clone(),
            app_name: config.openrouter_app_name.clone(),
        }
    }

    /// Buffered chat completion; returns the upstream body bytes unchanged
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, model = %request.model))]
    pub async fn chat(&self, request: &OpenRouterChatRequest, ctx: &RelayContext) -> AppResult<Bytes> {
        let response = self.send(request, ctx).await?;
        Ok(response.bytes().await?)
    }

    /// Streaming chat completion; returns the upstream byte stream unchanged
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, model = %request.model))]
    pub async fn chat_stream(
        &self,
        request: &OpenRouterChatRequest,
        ctx: &RelayContext,
    ) -> AppResult<ByteStream> {
        let response = self.send(request, ctx).await?;
        Ok(Box::pin(response.bytes_stream()))
    }

    /// POST `/chat/completions` with the key and attribution headers
    async fn send(
        &self,
        request: &OpenRouterChatRequest,
        ctx: &RelayContext,
    ) -> AppResult<reqwest::Response> {
        let api_key = require_key(&self.api_key, "OPENROUTER_API_KEY")?;

        let mut headers = build_bearer_headers(api_key)?;
        insert_optional(&mut headers, "http-referer", self.site_url.as_deref())?;
        insert_optional(&mut headers, "x-title", self.app_name.as_deref())?;

        let url = format!("{}/chat/completions", self.base_url);
        post_json(&self.client, ctx, &url, headers, request).await
    }
}
