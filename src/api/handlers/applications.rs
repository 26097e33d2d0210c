//! Worker-side application handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use crate::api::SharedState;
use crate::error::Result;
use crate::models::application::Application;

/// Routes nested under `/worker`
pub fn worker_router() -> Router<SharedState> {
    Router::new().route("/applications", get(list_mine))
}

/// Routes nested under `/applications`
pub fn router() -> Router<SharedState> {
    Router::new().route("/:id/complete", post(complete))
}

/// Applications filed by the calling worker
#[utoipa::path(
    get,
    path = "/api/worker/applications",
    tag = "worker",
    responses((status = 200, description = "The caller's applications", body = [Application]))
)]
pub async fn list_mine(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<Vec<Application>> {
    let ctx = state.auth.audit_context(&headers).await;
    let worker_id = ctx
        .actor_user_id
        .unwrap_or_else(|| "unknown".to_string());
    Json(state.venue.list_worker_applications(&worker_id).await)
}

/// Mark an accepted application as completed (worker action)
#[utoipa::path(
    post,
    path = "/api/applications/{id}/complete",
    tag = "worker",
    params(("id" = u64, Path, description = "Application id")),
    responses(
        (status = 200, description = "Completed application", body = Application),
        (status = 403, description = "Caller is not the application's worker"),
        (status = 404, description = "Unknown application"),
        (status = 409, description = "Application is not accepted")
    )
)]
pub async fn complete(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Application>> {
    let ctx = state.auth.audit_context(&headers).await;
    let worker_id = ctx
        .actor_user_id
        .clone()
        .unwrap_or_else(|| "unknown".to_string());
    Ok(Json(
        state.venue.complete_application(id, &worker_id, &ctx).await?,
    ))
}
