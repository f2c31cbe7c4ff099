//! Node endpoints

use axum::{body::Bytes, extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    routes::{db::insert_owned, parse_json},
    supabase::{ScopedClient, SuccessResponse, NODES},
};

/// Body of `PATCH /api/db/nodes/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateNodeTitle {
    pub title: String,
}

/// `POST /api/db/nodes`
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_node(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    insert_owned(&db, NODES, &user, parse_json(&body)?).await
}

/// `PATCH /api/db/nodes/:id`. Only the title is written.
#[instrument(skip_all, fields(user_id = %user.user_id, node_id = %id))]
pub async fn update_node_title(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<SuccessResponse>> {
    let UpdateNodeTitle { title } = parse_json(&body)?;

    let mut patch = Map::new();
    patch.insert("title".to_string(), Value::String(title));

    db.update(NODES, &id, &patch).await?;
    Ok(Json(SuccessResponse::ok()))
}
