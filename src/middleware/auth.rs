use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::access::Actor;
use crate::auth::JwtKeys;
use crate::state::AppState;

/// Every request resolves to an actor. A missing, malformed, expired or
/// foreign-signed token makes the caller anonymous; whether that is enough is
/// decided by the access rules, not here.
#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(resolve_actor(&parts.headers, &state.keys))
    }
}

pub fn resolve_actor(headers: &HeaderMap, keys: &JwtKeys) -> Actor {
    let token = match extract_jwt_from_headers(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Actor::Anonymous,
        Err(msg) => {
            tracing::debug!("Ignoring Authorization header: {}", msg);
            return Actor::Anonymous;
        }
    };

    match keys.verify(token) {
        Ok(claims) => Actor::Administrator { id: claims.sub },
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            Actor::Anonymous
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
