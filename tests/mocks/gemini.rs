//! Mock Gemini API for testing
//!
//! Provides wiremock-based mocks for:
//! - POST /models/{model}:generateContent

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants::GEMINI_API_KEY;

/// Mock Gemini server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI (used as the API base URL)
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Get all received requests
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Answer generateContent on `model` with one candidate made of `parts`
    pub async fn mock_generate_success(&self, model: &str, parts: &[&str]) {
        let parts: Vec<Value> = parts.iter().map(|t| json!({ "text": t })).collect();
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", model)))
            .and(header("x-goog-api-key", GEMINI_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": parts },
                    "finishReason": "STOP"
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail generateContent on `model` with a Google API error
    pub async fn mock_generate_error(&self, model: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", model)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&self.server)
            .await;
    }
}
