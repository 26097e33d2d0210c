//! Venue-facing gig management handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::application::Application;
use crate::models::gig::{Gig, GigSummary, SettlementRecord};
use crate::services::venue_service::{GigPatch, NewGig};

/// Create venue routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/gigs", get(list_gigs).post(create_gig))
        .route("/gigs/:id", patch(update_gig).delete(delete_gig))
        .route("/gigs/:id/publish", post(publish_gig))
        .route("/gigs/:id/settle", post(settle_gig))
        .route("/gigs/:id/applications", get(list_gig_applications))
        .route("/applications/:id/accept", post(accept_application))
        .route("/history", get(history))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGigRequest {
    pub title: Option<String>,
    pub pay_amount: Option<f64>,
    pub currency: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGigRequest {
    pub title: Option<String>,
    pub pay_amount: Option<f64>,
    pub currency: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// All gigs of the venue
#[utoipa::path(
    get,
    path = "/api/venue/gigs",
    tag = "venue",
    responses((status = 200, description = "All gigs with application counts", body = [GigSummary]))
)]
pub async fn list_gigs(State(state): State<SharedState>) -> Json<Vec<GigSummary>> {
    Json(state.venue.list_gigs().await)
}

/// Create a draft gig
#[utoipa::path(
    post,
    path = "/api/venue/gigs",
    tag = "venue",
    request_body = CreateGigRequest,
    responses(
        (status = 201, description = "Draft created", body = GigSummary),
        (status = 400, description = "Missing title or invalid pay amount")
    )
)]
pub async fn create_gig(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGigRequest>,
) -> Result<(StatusCode, Json<GigSummary>)> {
    let title = payload.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Titolo richiesto".into()));
    }
    let pay_amount = payload.pay_amount.unwrap_or(0.0);
    if !pay_amount.is_finite() || pay_amount <= 0.0 {
        return Err(AppError::Validation("Compenso non valido".into()));
    }

    let ctx = state.auth.audit_context(&headers).await;
    let created = state
        .venue
        .create_gig(
            NewGig {
                title,
                pay_amount,
                currency: payload.currency.unwrap_or_else(|| "EUR".to_string()),
                start_time: payload.start_time,
                end_time: payload.end_time,
                venue_id: payload.venue_id,
            },
            &ctx,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Patch an existing gig
#[utoipa::path(
    patch,
    path = "/api/venue/gigs/{id}",
    tag = "venue",
    params(("id" = u64, Path, description = "Gig id")),
    request_body = UpdateGigRequest,
    responses(
        (status = 200, description = "Updated gig", body = GigSummary),
        (status = 404, description = "Unknown gig")
    )
)]
pub async fn update_gig(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateGigRequest>,
) -> Result<Json<GigSummary>> {
    let ctx = state.auth.audit_context(&headers).await;
    let updated = state
        .venue
        .update_gig(
            id,
            GigPatch {
                title: payload.title,
                pay_amount: payload.pay_amount,
                currency: payload.currency,
                start_time: payload.start_time,
                end_time: payload.end_time,
            },
            &ctx,
        )
        .await?;
    Ok(Json(updated))
}

/// Delete a gig and its applications
#[utoipa::path(
    delete,
    path = "/api/venue/gigs/{id}",
    tag = "venue",
    params(("id" = u64, Path, description = "Gig id")),
    responses(
        (status = 200, description = "Gig removed"),
        (status = 404, description = "Unknown gig")
    )
)]
pub async fn delete_gig(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let ctx = state.auth.audit_context(&headers).await;
    state.venue.delete_gig(id, &ctx).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Publish a draft gig
#[utoipa::path(
    post,
    path = "/api/venue/gigs/{id}/publish",
    tag = "venue",
    params(("id" = u64, Path, description = "Gig id")),
    responses(
        (status = 200, description = "Published gig", body = Gig),
        (status = 404, description = "Unknown gig"),
        (status = 409, description = "Gig is not a draft")
    )
)]
pub async fn publish_gig(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Gig>> {
    let ctx = state.auth.audit_context(&headers).await;
    Ok(Json(state.venue.publish_gig(id, &ctx).await?))
}

/// Settle a completed gig
#[utoipa::path(
    post,
    path = "/api/venue/gigs/{id}/settle",
    tag = "venue",
    params(("id" = u64, Path, description = "Gig id")),
    responses(
        (status = 200, description = "Settled gig", body = Gig),
        (status = 404, description = "Unknown gig"),
        (status = 409, description = "Gig is not completed")
    )
)]
pub async fn settle_gig(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Gig>> {
    let ctx = state.auth.audit_context(&headers).await;
    Ok(Json(state.venue.settle_gig(id, &ctx).await?))
}

/// Applications filed against one gig
#[utoipa::path(
    get,
    path = "/api/venue/gigs/{id}/applications",
    tag = "venue",
    params(("id" = u64, Path, description = "Gig id")),
    responses((status = 200, description = "Applications for the gig", body = [Application]))
)]
pub async fn list_gig_applications(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Json<Vec<Application>> {
    Json(state.venue.list_gig_applications(id).await)
}

/// Accept a pending application
#[utoipa::path(
    post,
    path = "/api/venue/applications/{id}/accept",
    tag = "venue",
    params(("id" = u64, Path, description = "Application id")),
    responses(
        (status = 200, description = "Accepted application", body = Application),
        (status = 404, description = "Unknown application"),
        (status = 409, description = "Application is not pending")
    )
)]
pub async fn accept_application(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Application>> {
    let ctx = state.auth.audit_context(&headers).await;
    Ok(Json(state.venue.accept_application(id, &ctx).await?))
}

/// Settlement history for completed and settled gigs
#[utoipa::path(
    get,
    path = "/api/venue/history",
    tag = "venue",
    responses((status = 200, description = "Settlement records", body = [SettlementRecord]))
)]
pub async fn history(State(state): State<SharedState>) -> Json<Vec<SettlementRecord>> {
    Json(state.venue.list_history().await)
}
