//! Gemini AI provider implementation.
//!
//! Sends a single non-streaming `generateContent` call per request.

use super::{
    first_candidate_text, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use crate::config::UpstreamConfig;
use crate::services::sanitize::redact_secret;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: UpstreamConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: UpstreamConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Endpoint without the credential; the key is attached as a query pair.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

fn build_request<'a>(prompt: &'a str, params: &'a GenerationParams) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
        generation_config: (!params.is_empty()).then(|| GenerationConfig {
            response_mime_type: params.response_mime_type.as_deref(),
            response_schema: params.response_schema.as_ref(),
        }),
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = build_request(prompt, params);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            structured = !params.is_empty(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let raw: Value = serde_json::from_slice(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Gemini API returned {} with a non-JSON body: {}",
                status, e
            ))
        })?;

        if !status.is_success() {
            tracing::warn!(%status, "Gemini API returned non-success status");
        }

        let raw = redact_secret(raw, self.config.api_key.expose_secret());
        let text = first_candidate_text(&raw);

        Ok(ProviderResponse { text, raw })
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}
