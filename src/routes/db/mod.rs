//! Authenticated resource endpoints under `/api/db`
//!
//! Each handler runs behind the auth guard and talks to PostgREST through the
//! request's `ScopedClient`. Ownership is always stamped from the verified
//! identity; a caller-supplied `user_id` never reaches the database.

pub mod bugs;
pub mod conversations;
pub mod messages;
pub mod nodes;

use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    supabase::{ScopedClient, OWNER_COLUMN},
};

/// Require a JSON object body
pub fn into_object(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// Row for insertion with `user_id` forced to the caller's id
pub fn owned_row(body: Value, user: &AuthenticatedUser) -> AppResult<Map<String, Value>> {
    let mut row = into_object(body)?;
    row.insert(OWNER_COLUMN.to_string(), Value::String(user.user_id.clone()));
    Ok(row)
}

/// Patch body with any ownership change removed
pub fn unowned_patch(body: Value) -> AppResult<Map<String, Value>> {
    let mut patch = into_object(body)?;
    patch.remove(OWNER_COLUMN);
    Ok(patch)
}

/// ISO-8601 UTC timestamp with millisecond precision
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Insert an owned row into `table` and return it as stored
pub(crate) async fn insert_owned(
    db: &ScopedClient,
    table: &str,
    user: &AuthenticatedUser,
    body: Value,
) -> AppResult<Json<Value>> {
    let row = owned_row(body, user)?;
    let inserted = db.insert_single(table, &row).await?;
    Ok(Json(inserted))
}
