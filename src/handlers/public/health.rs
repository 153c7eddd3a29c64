use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Suggestion Box API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "auth": "/auth/signup, /auth/login (public)",
            "boxes": "/api/boxes[/:id] (owner, GET /api/boxes/:id is public)",
            "suggestions": "/api/suggestions (public submit), /api/boxes/:id/suggestions (owner)",
            "rate": "/api/suggestions/:id/rate (owner)",
            "export": "/api/boxes/:id/export (owner)",
        }
    }))
}

/// GET /health - 503 when the store cannot be reached
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.store.health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Store unavailable"));
    }

    Ok(Json(json!({ "status": "ok", "timestamp": chrono::Utc::now(), "store": "ok" })))
}
