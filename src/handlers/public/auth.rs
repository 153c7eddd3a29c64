use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::database::models::PublicAccount;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: PublicAccount,
}

/// POST /auth/signup - register an administrator
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<SignupRequest>,
) -> ApiResult<PublicAccount> {
    let account = state.accounts.signup(body.email, body.password, body.name).await?;
    Ok(ApiResponse::success("user", account))
}

/// POST /auth/login - exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state.accounts.login(body.email, body.password).await?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        expires_in: outcome.expires_in,
        user: outcome.user,
    }))
}
