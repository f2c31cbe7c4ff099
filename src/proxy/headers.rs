//! Header utilities for AI provider relays
//!
//! Upstream requests carry only the server-side provider credential. Client
//! headers are never copied onto them.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// Header Gemini reads its API key from
pub const GOOG_API_KEY: &str = "x-goog-api-key";

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid header value: {}", e)))
}

/// JSON headers authenticated with `Authorization: Bearer <api_key>`
pub fn build_bearer_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth = header_value(&format!("Bearer {}", api_key))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// JSON headers authenticated with Gemini's `x-goog-api-key`
pub fn build_goog_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut key = header_value(api_key)?;
    key.set_sensitive(true);
    headers.insert(GOOG_API_KEY, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Add an optional header when a value is configured
pub fn insert_optional(headers: &mut HeaderMap, name: &'static str, value: Option<&str>) -> AppResult<()> {
    if let Some(value) = value {
        headers.insert(name, header_value(value)?);
    }
    Ok(())
}
