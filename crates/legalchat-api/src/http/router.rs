//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // TODO: restrict allowed origins once the UI's deployment domain is fixed.
    // Credentials rule out `*`, so the request's own origin/method/headers are echoed.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(handlers::root::root))
        .route("/chat", post(handlers::chat::chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
