//! Public Supabase connection parameters
//!
//! Lets the client application run its own Supabase session. Only the anon key
//! may leave the server.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Response of `GET /api/config/supabase`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabasePublicConfig {
    pub url: String,
    pub key: String,
}

/// Handle `GET /api/config/supabase`
pub async fn supabase_config(State(state): State<Arc<AppState>>) -> AppResult<Json<SupabasePublicConfig>> {
    if !state.config.public_key_is_safe() {
        error!("Refusing to expose Supabase key: anon key equals service-role key");
        return Err(AppError::Internal(anyhow::anyhow!(
            "anon key equals service-role key"
        )));
    }

    Ok(Json(SupabasePublicConfig {
        url: state.supabase.url().to_string(),
        key: state.supabase.anon_key().to_string(),
    }))
}
