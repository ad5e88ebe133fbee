use axum::Json;
use serde::{Deserialize, Serialize};

use crate::completion::{can_advance, evaluate};
use crate::models::resume::null_as_default;
use crate::models::{ResumeData, StepDefinition};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ResumeData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<StepDefinition>,
    /// Index of the step the editor is on, if it wants a navigation verdict.
    #[serde(default)]
    pub current_step: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub percentage: u8,
    pub per_step_complete: std::collections::BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_advance: Option<bool>,
}

/// POST /api/v1/completion
pub async fn handle_completion(Json(request): Json<CompletionRequest>) -> Json<CompletionResponse> {
    let state = evaluate(&request.data, &request.steps);
    let advance = request
        .current_step
        .map(|index| can_advance(&request.steps, index, &request.data));
    Json(CompletionResponse {
        percentage: state.percentage,
        per_step_complete: state.per_step_complete,
        can_advance: advance,
    })
}
