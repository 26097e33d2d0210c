//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use super::middleware::auth::{admin_middleware, require_bearer};
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    // Build OpenAPI spec once at startup
    let openapi = super::openapi::build_openapi();

    // Routes that only require a bearer token to be present; the token is
    // validated by the external backend, not here.
    let protected = Router::new()
        .nest("/gigs", handlers::gigs::router())
        .nest("/venue", handlers::venue::router())
        .nest("/worker", handlers::applications::worker_router())
        .nest("/applications", handlers::applications::router())
        .layer(middleware::from_fn(require_bearer));

    // Admin routes resolve the caller via the backend and require the
    // admin role.
    let admin = Router::new()
        .nest("/admin", handlers::admin::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/audit", handlers::audit::router())
        .nest(
            "/uploads",
            handlers::uploads::router(state.config.max_upload_bytes),
        )
        .merge(protected)
        .merge(admin)
        // Everything else under /api belongs to the external backend
        .fallback(handlers::proxy::forward);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi))
        .nest("/api", api)
        .with_state(state)
}
