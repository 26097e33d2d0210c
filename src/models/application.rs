//! Worker application model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// A worker's request to be assigned to a gig. At most one per
/// (gig, worker) pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    pub gig_id: u64,
    pub worker_id: String,
    pub worker_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_lowercase() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Accepted,
            ApplicationStatus::Completed,
            ApplicationStatus::Rejected,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: ApplicationStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}
