//! Gemini relay endpoint

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::debug;

use crate::{
    error::AppResult,
    proxy::{
        gemini::{build_contents, GeminiGenerateRequest, GeminiTextResponse},
        logging::RelayContext,
        Provider,
    },
    routes::parse_json,
    AppState,
};

/// Handle `POST /api/gemini/generate`
///
/// Responds with `{text}` only, not the full provider response.
pub async fn gemini_generate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<GeminiTextResponse>> {
    let request: GeminiGenerateRequest = parse_json(&body)?;

    let model = state.gemini.resolve_model(request.model.as_deref());
    let ctx = RelayContext::new(Provider::Gemini).with_model(model.clone());
    ctx.started();

    if request.files.is_some() {
        debug!(trace_id = %ctx.trace_id, "Ignoring attached files");
    }

    let contents = build_contents(request.history.as_deref(), &request.prompt);

    let text = state
        .gemini
        .generate_text(&model, contents, &ctx)
        .await
        .map_err(|e| ctx.fail(e))?;

    ctx.completed();
    Ok(Json(GeminiTextResponse { text }))
}
