//! Relay call tracking
//!
//! A `RelayContext` follows one provider call from the inbound request to the
//! last streamed byte. It carries a short correlation id for the logs and owns
//! the mapping from internal failures to what the caller is allowed to see.

use std::time::Instant;

use axum::http::StatusCode;
use bytes::Bytes;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::AppError;

/// Upstream AI provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    OpenAI,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::OpenAI => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Generic message returned to callers when the relay fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "Failed to fetch from OpenRouter",
            Provider::OpenAI => "Failed to get response from OpenAI",
            Provider::Gemini => "Failed to generate content with Gemini",
        }
    }

    /// Only OpenRouter passes the upstream status on to the caller.
    pub fn keeps_upstream_status(&self) -> bool {
        matches!(self, Provider::OpenRouter)
    }

    /// Error the caller sees for `error`. Upstream details never leak.
    pub fn caller_error(&self, error: &AppError) -> AppError {
        let status = if self.keeps_upstream_status() {
            error.status()
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        AppError::upstream(status, self.failure_message())
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running totals for a piped event stream
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: usize,
    pub bytes: usize,
}

impl StreamStats {
    pub fn record(&mut self, chunk: &Bytes) {
        self.chunks += 1;
        self.bytes += chunk.len();
    }
}

/// One relay call
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Short id correlating every log line of this call
    pub trace_id: String,
    pub provider: Provider,
    pub model: Option<String>,
    pub streaming: bool,
    started: Instant,
}

impl RelayContext {
    pub fn new(provider: Provider) -> Self {
        let mut trace_id = Uuid::new_v4().simple().to_string();
        trace_id.truncate(8);

        Self {
            trace_id,
            provider,
            model: None,
            streaming: false,
            started: Instant::now(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    pub fn started(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = ?self.model,
            streaming = self.streaming,
            "Relay request started"
        );
    }

    pub fn sending(&self, url: &str) {
        debug!(trace_id = %self.trace_id, provider = %self.provider, url = %url, "Calling upstream");
    }

    pub fn upstream_status(&self, status: StatusCode) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            status = status.as_u16(),
            elapsed_ms = %self.elapsed_ms(),
            "Upstream responded"
        );
    }

    /// Transport failure before any response arrived
    pub fn unreachable(&self, url: &str, error: &reqwest::Error) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            error = %error,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream unreachable"
        );
    }

    pub fn completed(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            elapsed_ms = %self.elapsed_ms(),
            "Relay request completed"
        );
    }

    pub fn stream_opened(&self) {
        info!(trace_id = %self.trace_id, provider = %self.provider, "Relaying event stream");
    }

    pub fn stream_error(&self, error: &reqwest::Error, stats: StreamStats) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            error = %error,
            chunks = stats.chunks,
            "Upstream stream broke"
        );
    }

    pub fn stream_closed(&self, stats: StreamStats) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            chunks = stats.chunks,
            bytes = stats.bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Event stream finished"
        );
    }

    /// Log `error` in full and return what the caller may see
    pub fn fail(&self, error: AppError) -> AppError {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = ?self.model,
            streaming = self.streaming,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Relay request failed"
        );
        self.provider.caller_error(&error)
    }
}
