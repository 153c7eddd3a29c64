use axum::extract::{Path, State};
use serde::Deserialize;

use crate::access::Actor;
use crate::database::models::Suggestion;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::CsvExport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateRequest {
    pub rating: Option<i64>,
}

/// GET /api/boxes/:id/suggestions - newest first
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    Path(box_id): Path<String>,
) -> ApiResult<Vec<Suggestion>> {
    let suggestions = state.suggestions.list_for_box(&actor, parse_id(&box_id)).await?;
    Ok(ApiResponse::success("suggestions", suggestions))
}

/// POST /api/suggestions/:id/rate
pub async fn rate(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<RateRequest>,
) -> ApiResult<Suggestion> {
    let suggestion = state.suggestions.rate(&actor, parse_id(&id), body.rating).await?;
    Ok(ApiResponse::success("suggestion", suggestion))
}

/// GET /api/boxes/:id/export - CSV attachment
pub async fn export(
    State(state): State<AppState>,
    actor: Actor,
    Path(box_id): Path<String>,
) -> Result<CsvExport, ApiError> {
    Ok(state.suggestions.export_csv(&actor, parse_id(&box_id)).await?)
}
