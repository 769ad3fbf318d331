//! Upstream model provider abstraction.
//!
//! The relay talks to a `TextProvider`; production wires in Gemini, tests
//! wire in the mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for provider operations.
///
/// Messages never include the request URL, which carries the credential.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// What came back from one upstream call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// `candidates[0].content.parts[0].text`, if the upstream produced one.
    pub text: Option<String>,

    /// Whole upstream body with the credential redacted.
    pub raw: Value,
}

/// Generation parameters for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    /// MIME type requested from the model (e.g. `application/json`).
    pub response_mime_type: Option<String>,

    /// Schema constraining structured output.
    pub response_schema: Option<Value>,
}

impl GenerationParams {
    /// JSON-mode output constrained by `schema`.
    pub fn structured_json(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.response_mime_type.is_none() && self.response_schema.is_none()
    }
}

/// `candidates[0].content.parts[0].text`, or `None` when that path is absent.
///
/// Only this one path is read; siblings of any shape are ignored.
pub fn first_candidate_text(raw: &Value) -> Option<String> {
    raw.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Trait for text/JSON generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Issue exactly one generation request for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_candidate_text() {
        let raw = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }], "role": "model" } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        });
        assert_eq!(first_candidate_text(&raw).as_deref(), Some("first"));
    }

    #[test]
    fn malformed_siblings_do_not_hide_first_text() {
        let later_part = json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }, { "text": 5 }] } }]
        });
        assert_eq!(first_candidate_text(&later_part).as_deref(), Some("ok"));

        let later_candidate = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "ok" }] } },
                { "content": "blocked" }
            ]
        });
        assert_eq!(first_candidate_text(&later_candidate).as_deref(), Some("ok"));
    }

    #[test]
    fn missing_pieces_yield_none() {
        assert_eq!(first_candidate_text(&json!({})), None);
        assert_eq!(first_candidate_text(&json!({ "candidates": [] })), None);
        assert_eq!(
            first_candidate_text(&json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
            None
        );
        assert_eq!(
            first_candidate_text(&json!({ "candidates": [{ "content": { "parts": [] } }] })),
            None
        );
        assert_eq!(
            first_candidate_text(&json!({ "candidates": [{ "content": { "parts": [{ "text": 5 }] } }] })),
            None
        );
        assert_eq!(first_candidate_text(&json!({ "candidates": null })), None);
    }
}
