//! Bug report endpoint

use axum::{body::Bytes, Extension, Json};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    routes::{db::insert_owned, parse_json},
    supabase::{ScopedClient, BUG_REPORTS},
};

/// `POST /api/db/bugs`
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_bug_report(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let report = insert_owned(&db, BUG_REPORTS, &user, parse_json(&body)?).await?;
    info!("Bug report filed");
    Ok(report)
}
