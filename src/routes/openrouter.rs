//! OpenRouter relay endpoint
//!
//! Buffered requests get the upstream JSON body back byte for byte. Streaming
//! requests get the upstream event stream piped through without parsing.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;

use crate::{
    error::{AppError, AppResult},
    proxy::{
        logging::{RelayContext, StreamStats},
        openrouter::OpenRouterChatRequest,
        ByteStream, Provider,
    },
    routes::{metrics::record_stream, parse_json},
    AppState,
};

/// Handle `POST /api/openrouter/chat`
pub async fn openrouter_chat(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let request: OpenRouterChatRequest = parse_json(&body)?;

    let ctx = RelayContext::new(Provider::OpenRouter)
        .with_model(request.model.clone())
        .with_streaming(request.stream);
    ctx.started();

    if request.stream {
        let upstream = state
            .openrouter
            .chat_stream(&request, &ctx)
            .await
            .map_err(|e| ctx.fail(e))?;

        ctx.stream_opened();
        return event_stream_response(upstream, ctx);
    }

    let bytes = state
        .openrouter
        .chat(&request, &ctx)
        .await
        .map_err(|e| ctx.fail(e))?;

    ctx.completed();
    build_response(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json"),
        Body::from(bytes),
    )
}

/// Pipe `upstream` to the caller as `text/event-stream`.
///
/// Chunks are yielded as the body is polled, so a slow reader pauses the
/// upstream read instead of growing a buffer.
fn event_stream_response(mut upstream: ByteStream, ctx: RelayContext) -> AppResult<Response> {
    let piped = async_stream::stream! {
        let mut stats = StreamStats::default();

        while let Some(item) = upstream.next().await {
            match &item {
                Ok(chunk) => stats.record(chunk),
                Err(e) => ctx.stream_error(e, stats),
            }
            yield item;
        }

        ctx.stream_closed(stats);
        record_stream(ctx.provider.as_str(), stats.chunks);
    };

    build_response(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive"),
        Body::from_stream(piped),
    )
}

fn build_response(builder: axum::http::response::Builder, body: Body) -> AppResult<Response> {
    builder
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
