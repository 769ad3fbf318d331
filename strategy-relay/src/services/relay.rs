//! The two relay operations: free-text analysis and structured suggestions.

use crate::error::RelayError;
use crate::models::{strategy_parameters_schema, AnalysisResponse};
use crate::services::providers::{GenerationParams, ProviderResponse, TextProvider};
use crate::services::sanitize::{strip_fences, HTML_FENCES, JSON_FENCES};
use serde_json::Value;
use std::sync::Arc;

/// Forwards prompts to the upstream model and reshapes its replies.
///
/// Holds no per-request state; clones share the same provider.
#[derive(Clone)]
pub struct RelayService {
    provider: Arc<dyn TextProvider>,
    suggestion_params: GenerationParams,
}

impl RelayService {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider,
            suggestion_params: GenerationParams::structured_json(strategy_parameters_schema()),
        }
    }

    /// Strategy analysis: candidate text with HTML fences removed.
    pub async fn analyze(&self, prompt: &str) -> Result<AnalysisResponse, RelayError> {
        let response = self
            .provider
            .generate(prompt, &GenerationParams::default())
            .await?;
        let text = candidate_text(response)?;

        Ok(AnalysisResponse {
            text: strip_fences(&text, HTML_FENCES),
        })
    }

    /// Parameter suggestion: candidate text parsed as the JSON object it holds.
    pub async fn suggest(&self, prompt: &str) -> Result<Value, RelayError> {
        let response = self
            .provider
            .generate(prompt, &self.suggestion_params)
            .await?;
        let text = candidate_text(response)?;
        let cleaned = strip_fences(&text, JSON_FENCES).trim().to_string();

        match serde_json::from_str(&cleaned) {
            Ok(value) => Ok(value),
            Err(source) => Err(RelayError::MalformedStructuredReply {
                text: cleaned,
                source,
            }),
        }
    }
}

fn candidate_text(response: ProviderResponse) -> Result<String, RelayError> {
    match response.text {
        Some(text) => Ok(text),
        None => Err(RelayError::UpstreamEmpty {
            details: response.raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderError;
    use serde_json::json;

    fn relay(provider: MockTextProvider) -> (RelayService, Arc<MockTextProvider>) {
        let provider = Arc::new(provider);
        (RelayService::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn analyze_strips_html_fences() {
        let (relay, provider) = relay(MockTextProvider::replying("```html<b>Buy</b>```"));

        let response = relay.analyze("analyze BTC").await.unwrap();

        assert_eq!(response.text, "<b>Buy</b>");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "analyze BTC");
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn analyze_does_not_trim_whitespace() {
        let (relay, _) = relay(MockTextProvider::replying("```html\n<p>Hold</p>\n```"));

        let response = relay.analyze("p").await.unwrap();

        assert_eq!(response.text, "\n<p>Hold</p>\n");
    }

    #[tokio::test]
    async fn suggest_parses_fenced_json_with_schema() {
        let (relay, provider) = relay(MockTextProvider::replying(
            "```json\n{\"shortMA\":10,\"longMA\":50,\"bbStdDev\":2.0,\"useSLTP\":true}\n```",
        ));

        let value = relay.suggest("suggest params").await.unwrap();

        assert_eq!(
            value,
            json!({ "shortMA": 10, "longMA": 50, "bbStdDev": 2.0, "useSLTP": true })
        );
        let calls = provider.calls();
        assert_eq!(
            calls[0].1.response_mime_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(
            calls[0].1.response_schema,
            Some(strategy_parameters_schema())
        );
    }

    #[tokio::test]
    async fn empty_candidates_carry_upstream_body() {
        let body = json!({ "candidates": [], "promptFeedback": { "blockReason": "OTHER" } });

        for suggest in [false, true] {
            let (relay, _) = relay(MockTextProvider::with_body(body.clone()));
            let err = if suggest {
                relay.suggest("p").await.unwrap_err()
            } else {
                relay.analyze("p").await.map(|_| ()).unwrap_err()
            };

            match err {
                RelayError::UpstreamEmpty { details } => assert_eq!(details, body),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn suggest_rejects_non_json_text() {
        let (relay, _) = relay(MockTextProvider::replying("```json\nshortMA is 10\n```"));

        let err = relay.suggest("p").await.unwrap_err();

        match err {
            RelayError::MalformedStructuredReply { text, .. } => assert_eq!(text, "shortMA is 10"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failures_surface_as_provider_errors() {
        let (relay, _) = relay(MockTextProvider::unreachable());

        let err = relay.analyze("p").await.unwrap_err();

        assert!(matches!(
            err,
            RelayError::Provider(ProviderError::NetworkError(_))
        ));
    }
}
