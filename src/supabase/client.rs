//! Supabase identity client
//!
//! Process-wide client that knows the project URL and the public key. It
//! resolves bearer tokens to users and mints token-scoped data clients; it
//! never holds a user credential itself.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, instrument, warn};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    supabase::{
        models::{AuthUser, BackendErrorBody},
        scoped::ScopedClient,
    },
};

/// Header carrying the project's public key
pub const API_KEY_HEADER: &str = "apikey";

/// Supabase client bound to the anon key
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    /// Project base URL
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Public (anon) key
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Resolve the user that owns `token`.
    ///
    /// Every failure, including transport errors, is reported as
    /// `Unauthorized` carrying the backend's message when one is available.
    #[instrument(skip(self, token), fields(token_len = token.len()))]
    pub async fn get_user(&self, token: &str) -> AppResult<AuthUser> {
        let url = format!("{}/auth/v1/user", self.base_url);

        debug!(url = %url, "Resolving user from token");

        let headers = self.token_headers(token)?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Supabase auth");
                AppError::Unauthorized(e.to_string())
            })?;

        let status = response.status();
        debug!(status = %status, "Supabase auth response status");

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "Token rejected by Supabase auth");
            let message =
                BackendErrorBody::message_from(&body).unwrap_or_else(|| "Invalid token".to_string());
            return Err(AppError::Unauthorized(message));
        }

        let user: AuthUser = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Supabase user response");
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        if user.id.is_empty() {
            warn!("Supabase auth returned no user for token");
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }

        debug!(user_id = %user.id, email = ?user.email, "Token resolved");
        Ok(user)
    }

    /// Build a data client that acts with `token`'s authority.
    ///
    /// Returns a fresh handle on every call; handles are never cached.
    pub fn for_token(&self, token: &str) -> AppResult<ScopedClient> {
        let mut headers = self.token_headers(token)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(ScopedClient::new(
            self.client.clone(),
            format!("{}/rest/v1", self.base_url),
            headers,
        ))
    }

    /// `apikey` + `Authorization: Bearer <token>`
    fn token_headers(&self, token: &str) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.anon_key)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid anon key: {}", e)))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}
