//! Audit log model: immutable entries, query filters, cursor pagination.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Append-only record of a sensitive action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: u64,
    pub ts: DateTime<Utc>,
    pub actor_user_id: String,
    pub actor_role: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub payload_json: String,
    pub ip: String,
    pub user_agent: String,
}

impl AuditEntry {
    /// Cursor pointing at this entry.
    pub fn cursor(&self) -> String {
        Cursor {
            ts: self.ts,
            id: self.id,
        }
        .encode()
    }
}

/// Request-scoped actor information attached to audit entries.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub actor_user_id: Option<String>,
    pub actor_role: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Filters for audit queries. All filters are conjunctive.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    /// Page size, clamped to 1..=200 (default 50)
    pub limit: Option<usize>,
    /// Opaque `{ts}:{id}` cursor from a previous page
    pub cursor: Option<String>,
    pub action: Option<String>,
    pub actor_user_id: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// Inclusive lower timestamp bound
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive free-text needle
    pub q: Option<String>,
}

/// One page of audit results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub items: Vec<AuditEntry>,
    pub next_cursor: Option<String>,
}

/// Pagination cursor: the (ts, id) position of the last entry seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub ts: DateTime<Utc>,
    pub id: u64,
}

impl Cursor {
    /// Encode as `{ts}:{id}`. The timestamp uses a `Z` offset so the id
    /// separator is always the last colon.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}",
            self.ts.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.id
        )
    }

    /// Parse a `{ts}:{id}` cursor, splitting at the last colon.
    pub fn parse(value: &str) -> Option<Self> {
        let (ts_part, id_part) = value.rsplit_once(':')?;
        let ts = DateTime::parse_from_rfc3339(ts_part).ok()?.with_timezone(&Utc);
        let id = id_part.parse().ok()?;
        Some(Self { ts, id })
    }

    /// Whether `entry` lies strictly before this cursor in the
    /// (ts desc, id desc) ordering.
    pub fn admits(&self, entry: &AuditEntry) -> bool {
        entry.ts < self.ts || (entry.ts == self.ts && entry.id < self.id)
    }
}
