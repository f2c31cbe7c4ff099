//! Canopy - AI provider relay and authenticated Supabase proxy
//!
//! This library provides the core functionality for the Canopy server. It
//! relays chat requests to OpenRouter, OpenAI and Gemini, and proxies
//! conversation data to Supabase with each caller's own token.

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod supabase;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{GeminiClient, OpenAIClient, OpenRouterClient};
pub use crate::supabase::{ScopedClient, SupabaseClient};

/// Application state shared across all request handlers.
///
/// Holds only process-lifetime, credential-fixed clients. Per-user data
/// clients are built by the auth guard and live in request extensions.
pub struct AppState {
    pub config: Config,
    /// Identity client (anon key only)
    pub supabase: SupabaseClient,
    pub openrouter: OpenRouterClient,
    pub openai: OpenAIClient,
    pub gemini: GeminiClient,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Shared connection pool. No request timeout: streams may run long.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        Ok(Self {
            supabase: SupabaseClient::new(http_client.clone(), &config),
            openrouter: OpenRouterClient::new(http_client.clone(), &config),
            openai: OpenAIClient::new(http_client.clone(), &config),
            gemini: GeminiClient::new(http_client, &config),
            config,
        })
    }
}
