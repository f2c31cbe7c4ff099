//! Conversation endpoints

use axum::{
    body::Bytes,
    extract::Path,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    routes::{
        db::{insert_owned, iso_timestamp, unowned_patch},
        parse_json,
    },
    supabase::{
        scoped::{eq, in_list},
        ConversationDetail, ScopedClient, SuccessResponse, CONVERSATIONS, MESSAGES, NODES,
    },
};

/// Column recording the last change to a conversation
const UPDATED_AT: &str = "updated_at";

/// `GET /api/db/conversations`, newest first.
///
/// No user filter is applied here; row-level security scopes the result.
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn list_conversations(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
) -> AppResult<Json<Vec<Value>>> {
    let rows = db
        .select(CONVERSATIONS, vec![("order", "updated_at.desc".to_string())])
        .await?;

    debug!(count = rows.len(), "Listed conversations");
    Ok(Json(rows))
}

/// `GET /api/db/conversations/:id` returns the conversation's nodes and
/// their messages. A failed node fetch aborts before messages are queried.
#[instrument(skip_all, fields(user_id = %user.user_id, conversation_id = %id))]
pub async fn get_conversation(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    Path(id): Path<String>,
) -> AppResult<Json<ConversationDetail>> {
    let nodes = db
        .select(NODES, vec![("conversations_id", eq(&id))])
        .await?;

    let node_ids: Vec<Value> = nodes
        .iter()
        .filter_map(|node| node.get("id").cloned())
        .collect();

    let messages = if node_ids.is_empty() {
        Vec::new()
    } else {
        db.select(
            MESSAGES,
            vec![
                ("nodes_id", in_list(&node_ids)),
                ("order", "ordinal.asc".to_string()),
            ],
        )
        .await?
    };

    debug!(nodes = nodes.len(), messages = messages.len(), "Loaded conversation");
    Ok(Json(ConversationDetail { nodes, messages }))
}

/// `POST /api/db/conversations`
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_conversation(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let created = insert_owned(&db, CONVERSATIONS, &user, parse_json(&body)?).await?;
    info!("Conversation created");
    Ok(created)
}

/// Caller fields plus a server-side `updated_at`
pub fn conversation_patch(body: Value, now: DateTime<Utc>) -> AppResult<Map<String, Value>> {
    let mut patch = unowned_patch(body)?;
    patch.insert(UPDATED_AT.to_string(), Value::String(iso_timestamp(now)));
    Ok(patch)
}

/// `PATCH /api/db/conversations/:id`
#[instrument(skip_all, fields(user_id = %user.user_id, conversation_id = %id))]
pub async fn update_conversation(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<SuccessResponse>> {
    let patch = conversation_patch(parse_json(&body)?, Utc::now())?;
    db.update(CONVERSATIONS, &id, &patch).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `DELETE /api/db/conversations/:id`
///
/// Nodes and messages are left to the database's foreign-key rules.
#[instrument(skip_all, fields(user_id = %user.user_id, conversation_id = %id))]
pub async fn delete_conversation(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(db): Extension<ScopedClient>,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    db.delete(CONVERSATIONS, &id).await?;
    info!("Conversation deleted");
    Ok(Json(SuccessResponse::ok()))
}
