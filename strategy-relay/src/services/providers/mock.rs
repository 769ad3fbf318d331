//! Mock provider implementation for testing.

use super::{
    first_candidate_text, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

enum Behavior {
    Body(Value),
    Unreachable,
}

/// Mock text provider that replays a canned upstream body.
///
/// Every call is recorded so tests can inspect what would have been sent.
pub struct MockTextProvider {
    behavior: Behavior,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockTextProvider {
    /// Upstream answers with a single candidate containing `text`.
    pub fn replying(text: &str) -> Self {
        Self::with_body(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
    }

    /// Upstream answers with an arbitrary JSON body.
    pub fn with_body(body: Value) -> Self {
        Self {
            behavior: Behavior::Body(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Upstream cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            behavior: Behavior::Unreachable,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts and parameters received so far, in call order.
    pub fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), params.clone()));
        }

        match &self.behavior {
            Behavior::Body(body) => Ok(ProviderResponse {
                text: first_candidate_text(body),
                raw: body.clone(),
            }),
            Behavior::Unreachable => Err(ProviderError::NetworkError(
                "error sending request".to_string(),
            )),
        }
    }
}
