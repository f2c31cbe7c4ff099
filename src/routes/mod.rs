//! HTTP routes for Canopy
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod config;
pub mod db;
pub mod gemini;
pub mod health;
pub mod metrics;
pub mod openai;
pub mod openrouter;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::auth_middleware,
    AppState,
};

/// Parse a JSON request body, reporting failures as `400`
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Data routes: every request passes the auth guard first
    let db_routes = Router::new()
        .route(
            "/api/db/conversations",
            get(db::conversations::list_conversations).post(db::conversations::create_conversation),
        )
        .route(
            "/api/db/conversations/:id",
            get(db::conversations::get_conversation)
                .patch(db::conversations::update_conversation)
                .delete(db::conversations::delete_conversation),
        )
        .route("/api/db/nodes", post(db::nodes::create_node))
        .route("/api/db/nodes/:id", patch(db::nodes::update_node_title))
        .route("/api/db/messages", post(db::messages::create_message))
        .route("/api/db/bugs", post(db::bugs::create_bug_report))
        // Unmatched paths fall through to 404 without reaching the guard
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // AI relays use server-side provider keys; no caller auth
    let relay_routes = Router::new()
        .route("/api/openrouter/chat", post(openrouter::openrouter_chat))
        .route("/api/openai/chat", post(openai::openai_chat))
        .route("/api/gemini/generate", post(gemini::gemini_generate));

    let public_routes = Router::new()
        .route("/api/config/supabase", get(config::supabase_config))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(relay_routes)
        .merge(db_routes)
        .route_layer(middleware::from_fn(metrics::track_metrics))
        // Global middleware (applied to all routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(state.config.max_body_bytes)),
        )
        .with_state(state)
}
