//! OpenAI relay endpoint
//!
//! Non-streaming only. Any failure is reported as a plain 500; the upstream
//! status is logged but not passed on.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::{
    error::AppResult,
    proxy::{logging::RelayContext, openai::OpenAIChatRequest, Provider},
    routes::parse_json,
    AppState,
};

/// Handle `POST /api/openai/chat`
pub async fn openai_chat(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Json<Value>> {
    let request: OpenAIChatRequest = parse_json(&body)?;

    let ctx = RelayContext::new(Provider::OpenAI).with_model(request.model.clone());
    ctx.started();

    let completion = state
        .openai
        .chat_completion(&request, &ctx)
        .await
        .map_err(|e| ctx.fail(e))?;

    ctx.completed();
    Ok(Json(completion))
}
