//! Audit logging service.
//!
//! Tracks all significant actions in the system for compliance review.
//! Entries are appended to a single JSON file and never modified.

use std::path::Path;

use crate::error::Result;
use crate::models::audit::{AuditContext, AuditEntry, AuditPage, AuditQuery, Cursor};
use crate::store::{next_id, JsonFile};

/// Audit action types
#[derive(Debug, Clone, Copy)]
pub enum AuditAction {
    // Gig lifecycle
    GigCreated,
    GigUpdated,
    GigPublished,
    GigDeleted,
    GigAccepted,
    GigCompleted,
    GigSettled,

    // Application lifecycle
    ApplicationCreated,
    ApplicationAccepted,
    ApplicationCompleted,

    // Users
    UserDisabled,

    // Files
    Upload,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::GigCreated => "gig_created",
            AuditAction::GigUpdated => "gig_updated",
            AuditAction::GigPublished => "gig_published",
            AuditAction::GigDeleted => "gig_deleted",
            AuditAction::GigAccepted => "gig_accepted",
            AuditAction::GigCompleted => "gig_completed",
            AuditAction::GigSettled => "gig_settled",
            AuditAction::ApplicationCreated => "application_created",
            AuditAction::ApplicationAccepted => "application_accepted",
            AuditAction::ApplicationCompleted => "application_completed",
            AuditAction::UserDisabled => "user_disabled",
            AuditAction::Upload => "upload",
        }
    }
}

/// Entity types for audit logging
#[derive(Debug, Clone, Copy)]
pub enum EntityType {
    Gig,
    Application,
    Upload,
    User,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Gig => "gig",
            EntityType::Application => "application",
            EntityType::Upload => "upload",
            EntityType::User => "user",
        }
    }
}

/// Audit event builder
#[derive(Debug, Clone)]
pub struct AuditEvent {
    actor_user_id: Option<String>,
    actor_role: Option<String>,
    action: String,
    entity_type: String,
    entity_id: Option<String>,
    payload: serde_json::Value,
    ip: Option<String>,
    user_agent: Option<String>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, entity_type: EntityType) -> Self {
        Self::raw(action.as_str(), entity_type.as_str())
    }

    /// Event with free-form action/entity strings (client-reported events).
    pub fn raw(action: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            actor_user_id: None,
            actor_role: None,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: None,
            payload: serde_json::json!({}),
            ip: None,
            user_agent: None,
        }
    }

    pub fn entity(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn context(mut self, ctx: &AuditContext) -> Self {
        self.actor_user_id = ctx.actor_user_id.clone();
        self.actor_role = ctx.actor_role.clone();
        self.ip = ctx.ip.clone();
        self.user_agent = ctx.user_agent.clone();
        self
    }
}

/// Audit service
pub struct AuditService {
    file: JsonFile<Vec<AuditEntry>>,
}

impl AuditService {
    pub fn new(audit_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(audit_dir.join("audit.json")),
        }
    }

    /// Append an audit entry. Ids are max+1, timestamps are assigned here.
    pub async fn log(&self, event: AuditEvent) -> Result<AuditEntry> {
        self.file
            .update(|entries| {
                let entry = AuditEntry {
                    id: next_id(entries.iter().map(|e| e.id)),
                    ts: now_micros(),
                    actor_user_id: normalize(event.actor_user_id.as_deref(), "unknown"),
                    actor_role: normalize(event.actor_role.as_deref(), "unknown"),
                    action: normalize(Some(&event.action), "unknown"),
                    entity_type: normalize(Some(&event.entity_type), "unknown"),
                    entity_id: normalize(event.entity_id.as_deref(), ""),
                    payload_json: event.payload.to_string(),
                    ip: normalize(event.ip.as_deref(), ""),
                    user_agent: normalize(event.user_agent.as_deref(), ""),
                };
                entries.push(entry.clone());
                Ok(entry)
            })
            .await
    }

    /// Query audit entries, newest first, with cursor pagination.
    pub async fn query(&self, query: &AuditQuery) -> AuditPage {
        let entries = self.file.load().await;
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let cursor = query.cursor.as_deref().and_then(Cursor::parse);
        let needle = query
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut filtered: Vec<AuditEntry> = entries
            .into_iter()
            .filter(|entry| matches_filters(entry, query, needle.as_deref()))
            .filter(|entry| cursor.map_or(true, |c| c.admits(entry)))
            .collect();

        filtered.sort_by(|a, b| b.ts.cmp(&a.ts).then(b.id.cmp(&a.id)));

        let has_more = filtered.len() > limit;
        filtered.truncate(limit);
        let next_cursor = match (has_more, filtered.last()) {
            (true, Some(last)) => Some(last.cursor()),
            _ => None,
        };

        AuditPage {
            items: filtered,
            next_cursor,
        }
    }
}

fn matches_filters(entry: &AuditEntry, query: &AuditQuery, needle: Option<&str>) -> bool {
    // Empty query params (`?action=`) mean "no filter"
    if let Some(action) = non_empty(&query.action) {
        if entry.action != action {
            return false;
        }
    }
    if let Some(actor) = non_empty(&query.actor_user_id) {
        if entry.actor_user_id != actor {
            return false;
        }
    }
    if let Some(entity_type) = non_empty(&query.entity_type) {
        if entry.entity_type != entity_type {
            return false;
        }
    }
    if let Some(entity_id) = non_empty(&query.entity_id) {
        if entry.entity_id != entity_id {
            return false;
        }
    }
    if let Some(from) = &query.from {
        if entry.ts < *from {
            return false;
        }
    }
    if let Some(to) = &query.to {
        if entry.ts > *to {
            return false;
        }
    }
    if let Some(needle) = needle {
        let haystack = format!(
            "{} {} {} {} {}",
            entry.action, entry.entity_type, entry.entity_id, entry.actor_user_id, entry.payload_json
        )
        .to_lowercase();
        if !haystack.contains(needle) {
            return false;
        }
    }
    true
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Timestamps are truncated to microseconds so they survive a cursor
/// encode/parse round trip without losing ordering information.
fn now_micros() -> chrono::DateTime<chrono::Utc> {
    use chrono::Timelike;

    let now = chrono::Utc::now();
    now.with_nanosecond(now.nanosecond() / 1000 * 1000)
        .unwrap_or(now)
}

/// Blank or absent strings collapse to the given fallback.
fn normalize(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_and_entity_names() {
        assert_eq!(AuditAction::GigCreated.as_str(), "gig_created");
        assert_eq!(AuditAction::GigSettled.as_str(), "gig_settled");
        assert_eq!(AuditAction::ApplicationAccepted.as_str(), "application_accepted");
        assert_eq!(AuditAction::UserDisabled.as_str(), "user_disabled");
        assert_eq!(AuditAction::Upload.as_str(), "upload");
        assert_eq!(EntityType::Gig.as_str(), "gig");
        assert_eq!(EntityType::Application.as_str(), "application");
        assert_eq!(EntityType::User.as_str(), "user");
    }

    #[test]
    fn builder_carries_context_and_payload() {
        let ctx = AuditContext {
            actor_user_id: Some("12".into()),
            actor_role: Some("venue".into()),
            ip: Some("10.0.0.1".into()),
            user_agent: Some("jest".into()),
        };
        let event = AuditEvent::new(AuditAction::GigPublished, EntityType::Gig)
            .entity(3)
            .payload(serde_json::json!({"fromStatus": "draft"}))
            .context(&ctx);

        assert_eq!(event.action, "gig_published");
        assert_eq!(event.entity_id.as_deref(), Some("3"));
        assert_eq!(event.actor_user_id.as_deref(), Some("12"));
        assert_eq!(event.ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn normalize_falls_back_on_blank() {
        assert_eq!(normalize(Some("x"), "unknown"), "x");
        assert_eq!(normalize(Some("   "), "unknown"), "unknown");
        assert_eq!(normalize(None, "unknown"), "unknown");
        assert_eq!(normalize(None, ""), "");
    }

    #[tokio::test]
    async fn log_assigns_sequential_ids_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let service = AuditService::new(dir.path());

        let first = service
            .log(AuditEvent::raw("gig_created", "gig").entity(1))
            .await
            .unwrap();
        let second = service.log(AuditEvent::raw("", "")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.action, "unknown");
        assert_eq!(second.entity_type, "unknown");
        assert_eq!(second.actor_user_id, "unknown");
        assert_eq!(second.entity_id, "");
    }
}
