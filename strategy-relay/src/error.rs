use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Every way a relay request can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Upstream answered but without a usable candidate. `details` is the
    /// redacted upstream body and is forwarded to the caller.
    #[error("Upstream returned no usable candidate")]
    UpstreamEmpty { details: Value },

    #[error("Upstream structured reply is not valid JSON: {source}")]
    MalformedStructuredReply {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream call failed: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::InvalidRequest(_) | RelayError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Relay request failed");
        } else {
            tracing::warn!(error = %self, "Rejected relay request");
        }

        let (error, details) = match self {
            RelayError::InvalidRequest(msg) => (msg, None),
            RelayError::ValidationError(err) => (
                "Invalid request".to_string(),
                Some(Value::String(err.to_string())),
            ),
            RelayError::UpstreamEmpty { details } => {
                ("No response from AI model".to_string(), Some(details))
            }
            RelayError::MalformedStructuredReply { text, .. } => (
                "Malformed response from AI model".to_string(),
                Some(Value::String(text)),
            ),
            RelayError::Provider(_) => ("Server error".to_string(), None),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}
