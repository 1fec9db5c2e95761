pub mod config;
pub mod errors;
pub mod middleware;
pub mod modules;
pub mod services;
pub mod store;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use middleware::error_detail::expose_error_detail;
use modules::auth::{auth_routes, interface::AccountRepository};
use modules::profile::{interface::BiodataRepository, profile_routes};
use services::jwt::JwtService;
use services::mailer::Mailer;

/// Process-wide dependencies, built once at startup and shared by every request.
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub biodata: Arc<dyn BiodataRepository>,
    pub jwt_service: JwtService,
    pub mailer: Arc<dyn Mailer>,
    /// Base of reset links when the request carries no `Origin`.
    pub public_url: String,
    pub expose_error_details: bool,
}

pub async fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes())
        .nest("/profile", profile_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state.clone(), expose_error_detail))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Alumni Network API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
