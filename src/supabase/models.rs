//! Supabase data models
//!
//! Shapes exchanged with the Supabase auth and PostgREST APIs. Row payloads are
//! kept as raw JSON so caller-defined columns pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Table holding conversation rows
pub const CONVERSATIONS: &str = "conversations";
/// Table holding conversation tree nodes
pub const NODES: &str = "nodes";
/// Table holding node messages
pub const MESSAGES: &str = "messages";
/// Table holding user bug reports
pub const BUG_REPORTS: &str = "bug_reports";

/// Column every owned row carries
pub const OWNER_COLUMN: &str = "user_id";

/// User record returned by `GET /auth/v1/user`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body returned by Supabase services.
///
/// GoTrue uses `msg`/`error_description`, PostgREST uses `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl BackendErrorBody {
    /// Best human-readable message in the body, if any
    pub fn best_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| match &self.error {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            })
            .filter(|m| !m.is_empty())
    }

    /// Extract a message from a raw response body, falling back to the text
    pub fn message_from(body: &str) -> Option<String> {
        match serde_json::from_str::<BackendErrorBody>(body) {
            Ok(parsed) => parsed.best_message(),
            Err(_) if !body.trim().is_empty() => Some(body.trim().to_string()),
            Err(_) => None,
        }
    }
}

/// Response of the conversation detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub nodes: Vec<Value>,
    pub messages: Vec<Value>,
}

/// Acknowledgement for updates and deletes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
