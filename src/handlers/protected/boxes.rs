use axum::extract::{Path, State};
use serde::Deserialize;

use crate::access::Actor;
use crate::api::BoxView;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::BoxInput;
use crate::state::AppState;

/// Body of create and update. Update replaces all three fields.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl From<BoxRequest> for BoxInput {
    fn from(body: BoxRequest) -> Self {
        BoxInput {
            title: body.title,
            description: body.description,
            color: body.color,
        }
    }
}

/// POST /api/boxes
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ValidJson(body): ValidJson<BoxRequest>,
) -> ApiResult<BoxView> {
    let record = state.boxes.create_box(&actor, body.into()).await?;
    Ok(ApiResponse::success("box", BoxView::new(record, state.public_origin())))
}

/// GET /api/boxes - the caller's boxes, newest first
pub async fn list(State(state): State<AppState>, actor: Actor) -> ApiResult<Vec<BoxView>> {
    let records = state.boxes.list_owned_boxes(&actor).await?;
    Ok(ApiResponse::success("boxes", BoxView::many(records, state.public_origin())))
}

/// PUT /api/boxes/:id
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<BoxRequest>,
) -> ApiResult<BoxView> {
    let record = state.boxes.update_box(&actor, parse_id(&id), body.into()).await?;
    Ok(ApiResponse::success("box", BoxView::new(record, state.public_origin())))
}

/// DELETE /api/boxes/:id
pub async fn delete(State(state): State<AppState>, actor: Actor, Path(id): Path<String>) -> ApiResult<bool> {
    state.boxes.delete_box(&actor, parse_id(&id)).await?;
    Ok(ApiResponse::success("success", true))
}
