pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
pub use crate::state::AppState;

/// Build the full HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .route("/", get(handlers::public::health::root))
        .route("/health", get(handlers::public::health::health))
        .merge(auth_routes())
        .merge(box_routes())
        .merge(suggestion_routes())
        .with_state(state);

    let router = match cors {
        Some(layer) => router.layer(layer),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/auth/signup", post(public::auth::signup))
        .route("/auth/login", post(public::auth::login))
        .route("/api/auth/whoami", get(protected::auth::whoami))
}

fn box_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/api/boxes", get(protected::boxes::list).post(protected::boxes::create))
        .route(
            "/api/boxes/:id",
            get(public::boxes::get)
                .put(protected::boxes::update)
                .delete(protected::boxes::delete),
        )
        .route("/api/boxes/:id/suggestions", get(protected::suggestions::list))
        .route("/api/boxes/:id/export", get(protected::suggestions::export))
}

fn suggestion_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/api/suggestions", post(public::suggestions::submit))
        .route("/api/suggestions/:id/rate", post(protected::suggestions::rate))
}

/// No origins configured means any origin may call the API.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
