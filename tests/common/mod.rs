//! Common test utilities for Canopy
//!
//! This module provides the shared harness used by the integration tests: the
//! real router wired to wiremock stand-ins for Supabase and every provider.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;

use canopy::{
    config::{Config, LogFormat, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_BODY_BYTES},
    routes, AppState,
};

use crate::mocks::{MockGemini, MockOpenAI, MockOpenRouter, MockSupabaseServer};

/// Test configuration constants
pub mod constants {
    /// Public key handed to clients and sent as `apikey`
    pub const ANON_KEY: &str = "test-anon-key";
    /// Privileged key; must never leave the server
    pub const SERVICE_KEY: &str = "test-service-role-key";
    /// Bearer token the mock identity backend accepts
    pub const TEST_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ1c2VyLTEyMyJ9.test";
    /// User the token resolves to
    pub const TEST_USER_ID: &str = "0b4d6a8e-3c1f-4e2a-9d7b-5f6e8a9c0d12";
    /// Test email
    pub const TEST_EMAIL: &str = "test@test.com";
    pub const OPENROUTER_API_KEY: &str = "test-openrouter-key";
    pub const OPENAI_API_KEY: &str = "test-openai-key";
    pub const GEMINI_API_KEY: &str = "test-gemini-key";
}

/// `Authorization` header value for the test token
pub fn auth_header() -> String {
    format!("Bearer {}", constants::TEST_TOKEN)
}

/// Build a config pointing every upstream at the given base URLs
pub fn test_config(supabase: &str, openrouter: &str, openai: &str, gemini: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        supabase_url: supabase.to_string(),
        supabase_anon_key: constants::ANON_KEY.to_string(),
        supabase_service_role_key: Some(constants::SERVICE_KEY.to_string()),
        openrouter_api_url: openrouter.to_string(),
        openrouter_api_key: Some(constants::OPENROUTER_API_KEY.to_string()),
        openrouter_site_url: Some("https://canopy.test".to_string()),
        openrouter_app_name: Some("Canopy Tests".to_string()),
        openai_api_url: openai.to_string(),
        openai_api_key: Some(constants::OPENAI_API_KEY.to_string()),
        gemini_api_url: gemini.to_string(),
        gemini_api_key: Some(constants::GEMINI_API_KEY.to_string()),
        gemini_default_model: DEFAULT_GEMINI_MODEL.to_string(),
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        log_format: LogFormat::Pretty,
    }
}

/// The router under test plus every upstream mock
pub struct TestHarness {
    pub server: TestServer,
    pub supabase: MockSupabaseServer,
    pub openrouter: MockOpenRouter,
    pub openai: MockOpenAI,
    pub gemini: MockGemini,
}

impl TestHarness {
    /// Start all mocks and a router using the default test config
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start all mocks, letting the caller adjust the config first
    pub async fn start_with(adjust: impl FnOnce(&mut Config)) -> Self {
        let supabase = MockSupabaseServer::start().await;
        let openrouter = MockOpenRouter::start().await;
        let openai = MockOpenAI::start().await;
        let gemini = MockGemini::start().await;

        let mut config = test_config(
            &supabase.uri(),
            &openrouter.uri(),
            &openai.uri(),
            &gemini.uri(),
        );
        adjust(&mut config);

        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            supabase,
            openrouter,
            openai,
            gemini,
        }
    }

    /// Start with the identity backend accepting the test token
    pub async fn authenticated() -> Self {
        let harness = Self::start().await;
        harness
            .supabase
            .mock_get_user_success(constants::TEST_TOKEN, constants::TEST_USER_ID, constants::TEST_EMAIL)
            .await;
        harness
    }
}
