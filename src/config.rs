//! Configuration management for Canopy
//!
//! Configuration is loaded from environment variables.

use anyhow::{bail, Context, Result};
use std::env;

/// Default request body limit (50 MB) so inlined attachments fit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Model used by the Gemini relay when the caller does not name one
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Supabase project URL (identity and data backend)
    pub supabase_url: String,
    /// Supabase anonymous (public) key, safe to hand to clients
    pub supabase_anon_key: String,
    /// Supabase service-role key. Never used for requests, only to check
    /// that it is not the key we expose.
    pub supabase_service_role_key: Option<String>,

    /// OpenRouter API URL
    pub openrouter_api_url: String,
    /// OpenRouter API key
    pub openrouter_api_key: Option<String>,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub openrouter_site_url: Option<String>,
    /// Sent as `X-Title` for OpenRouter app attribution
    pub openrouter_app_name: Option<String>,

    /// OpenAI API URL
    pub openai_api_url: String,
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Gemini API URL
    pub gemini_api_url: String,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Fallback Gemini model
    pub gemini_default_model: String,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build and validate a configuration from `lookup`, which maps a
    /// variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let config = Self {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "3001").parse().context("Invalid PORT")?,

            supabase_url: lookup("SUPABASE_URL")
                .context("SUPABASE_URL must be set")?
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: lookup("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY must be set")?,
            supabase_service_role_key: non_empty("SUPABASE_SERVICE_ROLE_KEY"),

            openrouter_api_url: var_or("OPENROUTER_API_URL", "https://openrouter.ai/api/v1"),
            openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            openrouter_site_url: non_empty("OPENROUTER_SITE_URL"),
            openrouter_app_name: non_empty("OPENROUTER_APP_NAME"),

            openai_api_url: var_or("OPENAI_API_URL", "https://api.openai.com/v1"),
            openai_api_key: non_empty("OPENAI_API_KEY"),

            gemini_api_url: var_or(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_default_model: var_or("GEMINI_DEFAULT_MODEL", DEFAULT_GEMINI_MODEL),

            max_body_bytes: match lookup("MAX_BODY_BYTES") {
                Some(v) => v.parse().context("Invalid MAX_BODY_BYTES")?,
                None => DEFAULT_MAX_BODY_BYTES,
            },

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would leak a privileged key to clients
    pub fn validate(&self) -> Result<()> {
        if self.supabase_anon_key.is_empty() {
            bail!("SUPABASE_ANON_KEY must not be empty");
        }
        if !self.public_key_is_safe() {
            bail!("SUPABASE_ANON_KEY must not be the service-role key");
        }
        Ok(())
    }

    /// True when the key exposed to clients differs from the service-role key
    pub fn public_key_is_safe(&self) -> bool {
        match &self.supabase_service_role_key {
            Some(service) => service != &self.supabase_anon_key,
            None => true,
        }
    }
}
