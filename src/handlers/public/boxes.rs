use axum::extract::{Path, State};

use crate::access::Actor;
use crate::api::BoxView;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/boxes/:id - anyone holding the link may read the box
pub async fn get(State(state): State<AppState>, actor: Actor, Path(id): Path<String>) -> ApiResult<BoxView> {
    let record = state.boxes.get_box(&actor, parse_id(&id)).await?;
    Ok(ApiResponse::success("box", BoxView::new(record, state.public_origin())))
}
