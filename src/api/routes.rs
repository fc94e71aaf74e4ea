//! Route definitions for the API.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};

use super::handlers;
use super::middleware::auth::auth_middleware;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    let auth_service = state.auth.clone();

    let api_routes = Router::new()
        // Generation endpoints; the body limit covers image uploads for
        // background removal
        .nest(
            "/ai",
            handlers::generate::router()
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10 MB
                .layer(middleware::from_fn_with_state(
                    auth_service.clone(),
                    auth_middleware,
                )),
        )
        // Dashboard and community feed endpoints
        .nest(
            "/user",
            handlers::creations::router().layer(middleware::from_fn_with_state(
                auth_service,
                auth_middleware,
            )),
        );

    Router::new()
        // Health endpoint (no auth required)
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes)
        .with_state(state)
}
