pub mod strategy;

pub use strategy::{strategy_parameters_schema, STRATEGY_PARAMETER_FIELDS};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body accepted by both `/api/analyze` and `/api/suggest`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromptRequest {
    #[validate(required(message = "prompt is required"))]
    pub prompt: Option<String>,
}

/// Successful analysis reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub text: String,
}
