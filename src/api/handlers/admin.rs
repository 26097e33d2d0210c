//! Admin console handlers (audit trail, user cache, gig overview).
//!
//! The admin gate itself lives in the middleware; every route here assumes
//! the caller already resolved to an admin.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::api::SharedState;
use crate::error::Result;
use crate::models::audit::{AuditPage, AuditQuery};
use crate::models::gig::GigSummary;
use crate::models::user::AdminUser;
use crate::services::audit_service::{AuditAction, AuditEvent, EntityType};

/// Create admin routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/audit", get(query_audit))
        .route("/users", get(list_users))
        .route("/users/:id/disable", post(disable_user))
        .route("/gigs", get(list_gigs))
}

/// Query the audit trail with filters and cursor pagination
#[utoipa::path(
    get,
    path = "/api/admin/audit",
    tag = "admin",
    params(AuditQuery),
    responses(
        (status = 200, description = "One page of audit entries", body = AuditPage),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn query_audit(
    State(state): State<SharedState>,
    Query(query): Query<AuditQuery>,
) -> Json<AuditPage> {
    Json(state.audit.query(&query).await)
}

/// List the locally cached users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses((status = 200, description = "Cached users", body = [AdminUser]))
)]
pub async fn list_users(State(state): State<SharedState>) -> Json<Vec<AdminUser>> {
    Json(state.users.list().await)
}

/// Disable a cached user (local flag only)
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/disable",
    tag = "admin",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Disabled user", body = AdminUser),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn disable_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AdminUser>> {
    let user = state.users.disable(&id).await?;

    let ctx = state.auth.audit_context(&headers).await;
    state
        .audit
        .log(
            AuditEvent::new(AuditAction::UserDisabled, EntityType::User)
                .entity(&user.id)
                .payload(json!({ "disabled": true }))
                .context(&ctx),
        )
        .await?;

    Ok(Json(user))
}

/// All gigs, for the admin overview
#[utoipa::path(
    get,
    path = "/api/admin/gigs",
    tag = "admin",
    responses((status = 200, description = "All gigs with application counts", body = [GigSummary]))
)]
pub async fn list_gigs(State(state): State<SharedState>) -> Json<Vec<GigSummary>> {
    Json(state.venue.list_gigs().await)
}
