//! Worker-facing gig board handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::SharedState;
use crate::error::Result;
use crate::models::application::Application;
use crate::models::gig::GigSummary;

/// Create gig board routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_published))
        .route("/:id/apply", post(apply))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default = "default_worker_name")]
    pub worker_name: String,
}

fn default_worker_name() -> String {
    "Worker".to_string()
}

/// Gigs currently open on the board (published or accepted)
#[utoipa::path(
    get,
    path = "/api/gigs",
    tag = "gigs",
    responses((status = 200, description = "Published gigs with application counts", body = [GigSummary]))
)]
pub async fn list_published(State(state): State<SharedState>) -> Json<Vec<GigSummary>> {
    Json(state.venue.list_published_gigs().await)
}

/// File an application against a published gig
#[utoipa::path(
    post,
    path = "/api/gigs/{id}/apply",
    tag = "gigs",
    params(("id" = u64, Path, description = "Gig id")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application filed", body = Application),
        (status = 404, description = "Unknown gig"),
        (status = 409, description = "Gig unavailable or duplicate application")
    )
)]
pub async fn apply(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>)> {
    let ctx = state.auth.audit_context(&headers).await;
    let worker_id = ctx
        .actor_user_id
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    let application = state
        .venue
        .apply_to_gig(id, &worker_id, &payload.worker_name, &ctx)
        .await?;

    Ok((StatusCode::CREATED, Json(application)))
}
