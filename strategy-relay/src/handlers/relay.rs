//! `/api/analyze` and `/api/suggest`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::RelayError,
    models::{AnalysisResponse, PromptRequest},
    AppState,
};

/// Strategy analysis: returns `{ text }` with fence markers removed.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, RelayError> {
    let prompt = extract_prompt(payload)?;
    let response = state.relay.analyze(&prompt).await?;

    tracing::info!(text_len = response.text.len(), "Analysis relayed");
    Ok(Json(response))
}

/// Parameter suggestion: returns the model's JSON object as-is.
pub async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<Value>, RelayError> {
    let prompt = extract_prompt(payload)?;
    let parameters = state.relay.suggest(&prompt).await?;

    tracing::info!("Parameter suggestion relayed");
    Ok(Json(parameters))
}

fn extract_prompt(
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<String, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
    request.validate()?;

    request
        .prompt
        .ok_or_else(|| RelayError::InvalidRequest("prompt is required".to_string()))
}
