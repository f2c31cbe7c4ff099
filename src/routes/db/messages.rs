//! Message endpoints

use axum::{body::Bytes, Extension, Json};
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    routes::{db::insert_owned, parse_json},
    supabase::{ScopedClient, MESSAGES},
};

/// `POST /api/db/messages`
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_message(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    insert_owned(&db, MESSAGES, &user, parse_json(&body)?).await
}
