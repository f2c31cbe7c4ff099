//! Mock OpenAI API for testing
//!
//! Provides wiremock-based mocks for:
//! - POST /chat/completions - Buffered chat completions

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants::OPENAI_API_KEY;

/// Mock OpenAI server wrapper
pub struct MockOpenAI {
    server: MockServer,
}

impl MockOpenAI {
    /// Start a new mock OpenAI server
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

    /// Answer chat completions with `completion`
    pub async fn mock_chat_success(&self, completion: Value) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", format!("Bearer {}", OPENAI_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion))
            .mount(&self.server)
            .await;
    }

    /// Fail with `status` and an OpenAI error body
    pub async fn mock_chat_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": message, "type": "invalid_request_error" }
            })))
            .mount(&self.server)
            .await;
    }
}

/// A minimal chat completion
pub fn simple_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-abc",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
