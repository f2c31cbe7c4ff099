//! Proxy module
//!
//! Process-wide clients for the upstream AI providers. Each holds the single
//! server-side credential for its provider and is shared by all requests.

pub mod gemini;
pub mod headers;
pub mod logging;
pub mod openai;
pub mod openrouter;

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use logging::RelayContext;

pub use gemini::GeminiClient;
pub use logging::Provider;
pub use openai::OpenAIClient;
pub use openrouter::OpenRouterClient;

/// Stream type for streaming responses from AI providers
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// The configured key, or an internal error naming the missing variable
fn require_key<'a>(key: &'a Option<String>, var: &str) -> AppResult<&'a str> {
    key.as_deref()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("{} is not configured", var)))
}

/// POST `body` as JSON to `url`.
///
/// Non-2xx responses become `Upstream` errors carrying the upstream status
/// and body text; the route decides how much of that the caller sees.
async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    ctx: &RelayContext,
    url: &str,
    headers: HeaderMap,
    body: &B,
) -> AppResult<reqwest::Response> {
    ctx.sending(url);

    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            ctx.unreachable(url, &e);
            e
        })?;

    let status = response.status();
    ctx.upstream_status(status);

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::upstream(
            status,
            format!("{} error {}: {}", ctx.provider, status, text),
        ));
    }

    Ok(response)
}
