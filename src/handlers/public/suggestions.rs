use axum::extract::State;
use serde::Deserialize;

use crate::access::Actor;
use crate::database::models::Suggestion;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::SubmissionInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRequest {
    #[serde(rename = "boxId")]
    pub box_id: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i64>,
}

/// POST /api/suggestions - anonymous submission to a box
pub async fn submit(
    State(state): State<AppState>,
    actor: Actor,
    ValidJson(body): ValidJson<SubmitRequest>,
) -> ApiResult<Suggestion> {
    let input = SubmissionInput {
        box_id: body.box_id,
        content: body.content,
        rating: body.rating,
    };
    let suggestion = state.suggestions.submit(&actor, input).await?;
    Ok(ApiResponse::success("suggestion", suggestion))
}
