use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::middleware::auth::require_auth;
use crate::AppState;
use super::controller;

/// Every profile route sits behind bearer-token authentication.
pub fn profile_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/biodata",
            get(controller::get_biodata).post(controller::save_biodata),
        )
        .route("/check-biodata", get(controller::check_biodata))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
