//! Client-reported audit events.
//!
//! The frontend posts significant UI actions here. Events with a known
//! actor also refresh the local user cache so the admin console can see
//! who has been active.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::api::SharedState;
use crate::error::Result;
use crate::models::audit::AuditContext;
use crate::services::audit_service::AuditEvent;

/// Create audit reporting routes
pub fn router() -> Router<SharedState> {
    Router::new().route("/log", post(report))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportAuditRequest {
    /// Actor id; number or string
    pub actor_user_id: Option<Value>,
    pub actor_role: Option<String>,
    pub actor_email: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    /// Entity id; number or string
    pub entity_id: Option<Value>,
    pub payload: Option<Value>,
}

/// Record a client-reported audit event
#[utoipa::path(
    post,
    path = "/api/audit/log",
    tag = "audit",
    request_body = ReportAuditRequest,
    responses(
        (status = 200, description = "Event recorded"),
        (status = 400, description = "Malformed JSON body")
    )
)]
pub async fn report(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ReportAuditRequest>,
) -> Result<Json<Value>> {
    let ctx = state.auth.audit_context(&headers).await;

    let actor_user_id = payload
        .actor_user_id
        .as_ref()
        .and_then(value_to_string)
        .or(ctx.actor_user_id)
        .unwrap_or_else(|| "unknown".to_string());
    let actor_role = payload
        .actor_role
        .or(ctx.actor_role)
        .unwrap_or_else(|| "unknown".to_string());
    let actor_email = payload.actor_email.or_else(|| {
        headers
            .get("x-actor-email")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    if actor_user_id != "unknown" {
        state
            .users
            .upsert(&actor_user_id, actor_email, Some(actor_role.clone()))
            .await?;
    }

    let event_ctx = AuditContext {
        actor_user_id: Some(actor_user_id),
        actor_role: Some(actor_role),
        ip: ctx.ip,
        user_agent: ctx.user_agent,
    };
    let mut event = AuditEvent::raw(
        payload.action.unwrap_or_else(|| "unknown".to_string()),
        payload.entity_type.unwrap_or_else(|| "unknown".to_string()),
    )
    .payload(payload.payload.unwrap_or_else(|| json!({})))
    .context(&event_ctx);
    if let Some(entity_id) = payload.entity_id.as_ref().and_then(value_to_string) {
        event = event.entity(entity_id);
    }
    state.audit.log(event).await?;

    Ok(Json(json!({ "ok": true })))
}

/// String or numeric JSON values become strings; everything else is dropped.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
