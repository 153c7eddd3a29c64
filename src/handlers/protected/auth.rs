use uuid::Uuid;

use crate::access::Actor;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/whoami
pub async fn whoami(actor: Actor) -> ApiResult<Uuid> {
    let id = actor.admin_id().ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;
    Ok(ApiResponse::success("user_id", id))
}
