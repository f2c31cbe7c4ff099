//! Authentication middleware
//!
//! Resolves the bearer token against Supabase auth on every request and
//! attaches the caller's identity plus a token-scoped data client.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::{error::AppError, AppState};

/// Identity of the caller, valid for a single request.
///
/// Handlers read `user_id` from here when stamping ownership on writes.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub token: String,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("token_hash", &hash_token(&self.token))
            .finish()
    }
}

/// Extract the Authorization header and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Hash a token for log correlation
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Resolves it with Supabase auth (no caching)
/// 3. Builds a data client scoped to that token
/// 4. Adds AuthenticatedUser and the client to request extensions
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string)
        .ok_or_else(|| {
            debug!("Request without bearer token");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token_hash = hash_token(&token);
    debug!(token_hash = %token_hash, "Processing authentication request");

    let profile = match state.supabase.get_user(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(token_hash = %token_hash, error = %e, "Token validation failed");
            return Err(e);
        }
    };

    let db = state.supabase.for_token(&token)?;

    let user = AuthenticatedUser {
        user_id: profile.id,
        email: profile.email,
        token,
    };

    debug!(
        user_id = %user.user_id,
        email = ?user.email,
        "User authenticated successfully"
    );

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(db);

    Ok(next.run(request).await)
}
