//! Gig model and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gig lifecycle status. Transitions are one-directional:
/// draft -> published -> accepted -> completed -> settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Draft,
    Published,
    Accepted,
    Completed,
    Settled,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Draft => "draft",
            GigStatus::Published => "published",
            GigStatus::Accepted => "accepted",
            GigStatus::Completed => "completed",
            GigStatus::Settled => "settled",
        }
    }

    /// Workers can apply while the gig is visible on the board.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, GigStatus::Published | GigStatus::Accepted)
    }
}

/// A work engagement created by a venue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: u64,
    pub title: String,
    pub status: GigStatus,
    pub pay_amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub venue_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preauthorized_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_confirmed_at: Option<DateTime<Utc>>,
}

impl Gig {
    /// Policy snapshot reference, with the `pol_{id}` fallback used before
    /// the completion stamp exists.
    pub fn policy_snapshot_ref(&self) -> String {
        self.policy_snapshot_id
            .clone()
            .unwrap_or_else(|| format!("pol_{}", self.id))
    }

    /// Engagement reference, with the `eng_{id}` fallback.
    pub fn engagement_ref(&self) -> String {
        self.engagement_id
            .clone()
            .unwrap_or_else(|| format!("eng_{}", self.id))
    }
}

/// A gig as listed, carrying the derived application count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GigSummary {
    #[serde(flatten)]
    pub gig: Gig,
    pub applications_count: usize,
}

/// Settlement record for the venue history view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    pub gig_id: u64,
    pub title: String,
    pub policy_snapshot_id: String,
    pub engagement_id: String,
    pub compensation: f64,
    pub currency: String,
    pub preauthorized_at: DateTime<Utc>,
    /// Empty string until the gig is settled.
    pub payment_confirmed_at: String,
}
