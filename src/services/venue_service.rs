//! Gig and application lifecycle over the venue store.
//!
//! One JSON file holds both collections; every mutation rewrites it in full
//! and appends to the audit log.

use std::path::Path;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::audit::AuditContext;
use crate::models::gig::{Gig, GigStatus, GigSummary, SettlementRecord};
use crate::services::audit_service::{AuditAction, AuditEvent, AuditService, EntityType};
use crate::store::{next_id, JsonFile};

/// On-disk shape of venue.json.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VenueData {
    #[serde(default)]
    pub gigs: Vec<Gig>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl VenueData {
    fn applications_count(&self, gig_id: u64) -> usize {
        self.applications.iter().filter(|a| a.gig_id == gig_id).count()
    }

    fn summarize(&self, gig: &Gig) -> GigSummary {
        GigSummary {
            gig: gig.clone(),
            applications_count: self.applications_count(gig.id),
        }
    }
}

/// Fields accepted when creating a gig.
#[derive(Debug, Clone)]
pub struct NewGig {
    pub title: String,
    pub pay_amount: f64,
    pub currency: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue_id: Option<i64>,
}

/// Partial update of a gig. Status is never patchable.
#[derive(Debug, Clone, Default)]
pub struct GigPatch {
    pub title: Option<String>,
    pub pay_amount: Option<f64>,
    pub currency: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Venue service: gig CRUD and the lifecycle state machine.
pub struct VenueService {
    file: JsonFile<VenueData>,
    audit: Arc<AuditService>,
}

impl VenueService {
    pub fn new(data_dir: &Path, audit: Arc<AuditService>) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("venue.json")),
            audit,
        }
    }

    /// All gigs with their application counts.
    pub async fn list_gigs(&self) -> Vec<GigSummary> {
        let data = self.file.load().await;
        data.gigs.iter().map(|gig| data.summarize(gig)).collect()
    }

    /// Gigs visible on the worker board (published or accepted).
    pub async fn list_published_gigs(&self) -> Vec<GigSummary> {
        let data = self.file.load().await;
        data.gigs
            .iter()
            .filter(|gig| gig.status.accepts_applications())
            .map(|gig| data.summarize(gig))
            .collect()
    }

    /// Create a gig in `draft`.
    pub async fn create_gig(&self, input: NewGig, ctx: &AuditContext) -> Result<GigSummary> {
        let gig = self
            .file
            .update(|data| {
                let now = Utc::now();
                let gig = Gig {
                    id: next_id(data.gigs.iter().map(|g| g.id)),
                    title: input.title.clone(),
                    status: GigStatus::Draft,
                    pay_amount: input.pay_amount,
                    currency: input.currency.clone(),
                    start_time: input.start_time.clone(),
                    end_time: input.end_time.clone(),
                    venue_id: input.venue_id,
                    created_at: now,
                    updated_at: now,
                    policy_snapshot_id: None,
                    engagement_id: None,
                    preauthorized_at: None,
                    payment_confirmed_at: None,
                };
                data.gigs.push(gig.clone());
                Ok(gig)
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::GigCreated, EntityType::Gig)
                    .entity(gig.id)
                    .payload(json!({ "status": gig.status, "title": gig.title }))
                    .context(ctx),
            )
            .await?;

        Ok(GigSummary {
            gig,
            applications_count: 0,
        })
    }

    /// Patch editable gig fields.
    pub async fn update_gig(&self, id: u64, patch: GigPatch, ctx: &AuditContext) -> Result<GigSummary> {
        let summary = self
            .file
            .update(|data| {
                let gig = data
                    .gigs
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| AppError::NotFound("Gig non trovato".into()))?;
                if let Some(title) = &patch.title {
                    gig.title = title.clone();
                }
                if let Some(pay_amount) = patch.pay_amount {
                    gig.pay_amount = pay_amount;
                }
                if let Some(currency) = &patch.currency {
                    gig.currency = currency.clone();
                }
                if let Some(start_time) = &patch.start_time {
                    gig.start_time = Some(start_time.clone());
                }
                if let Some(end_time) = &patch.end_time {
                    gig.end_time = Some(end_time.clone());
                }
                gig.updated_at = Utc::now();
                let gig = gig.clone();
                Ok(data.summarize(&gig))
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::GigUpdated, EntityType::Gig)
                    .entity(summary.gig.id)
                    .payload(json!({
                        "title": summary.gig.title,
                        "payAmount": summary.gig.pay_amount,
                        "currency": summary.gig.currency,
                    }))
                    .context(ctx),
            )
            .await?;

        Ok(summary)
    }

    /// draft -> published; stamps the preauthorization time.
    pub async fn publish_gig(&self, id: u64, ctx: &AuditContext) -> Result<Gig> {
        let (gig, from) = self
            .file
            .update(|data| {
                let gig = data
                    .gigs
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| AppError::NotFound("Gig non trovato".into()))?;
                if gig.status != GigStatus::Draft {
                    return Err(AppError::Conflict("Transizione non valida".into()));
                }
                let from = gig.status;
                let now = Utc::now();
                gig.status = GigStatus::Published;
                gig.preauthorized_at.get_or_insert(now);
                gig.updated_at = now;
                Ok((gig.clone(), from))
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::GigPublished, EntityType::Gig)
                    .entity(gig.id)
                    .payload(json!({ "fromStatus": from, "toStatus": gig.status }))
                    .context(ctx),
            )
            .await?;

        Ok(gig)
    }

    /// Remove a gig together with its applications.
    pub async fn delete_gig(&self, id: u64, ctx: &AuditContext) -> Result<()> {
        self.file
            .update(|data| {
                let before = data.gigs.len();
                data.gigs.retain(|g| g.id != id);
                if data.gigs.len() == before {
                    return Err(AppError::NotFound("Gig non trovato".into()));
                }
                data.applications.retain(|a| a.gig_id != id);
                Ok(())
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::GigDeleted, EntityType::Gig)
                    .entity(id)
                    .context(ctx),
            )
            .await?;

        Ok(())
    }

    /// Applications filed against one gig.
    pub async fn list_gig_applications(&self, gig_id: u64) -> Vec<Application> {
        let data = self.file.load().await;
        data.applications
            .into_iter()
            .filter(|a| a.gig_id == gig_id)
            .collect()
    }

    /// Applications filed by one worker.
    pub async fn list_worker_applications(&self, worker_id: &str) -> Vec<Application> {
        let data = self.file.load().await;
        data.applications
            .into_iter()
            .filter(|a| a.worker_id == worker_id)
            .collect()
    }

    /// File a worker's application against a published gig.
    pub async fn apply_to_gig(
        &self,
        gig_id: u64,
        worker_id: &str,
        worker_name: &str,
        ctx: &AuditContext,
    ) -> Result<Application> {
        let application = self
            .file
            .update(|data| {
                let gig = data
                    .gigs
                    .iter()
                    .find(|g| g.id == gig_id)
                    .ok_or_else(|| AppError::NotFound("Gig non trovato".into()))?;
                if !gig.status.accepts_applications() {
                    return Err(AppError::Conflict("Gig non disponibile".into()));
                }
                let duplicate = data
                    .applications
                    .iter()
                    .any(|a| a.gig_id == gig_id && a.worker_id == worker_id);
                if duplicate {
                    return Err(AppError::Conflict("Candidatura gia inviata".into()));
                }
                let application = Application {
                    id: next_id(data.applications.iter().map(|a| a.id)),
                    gig_id,
                    worker_id: worker_id.to_string(),
                    worker_name: worker_name.to_string(),
                    status: ApplicationStatus::Pending,
                    applied_at: Utc::now(),
                };
                data.applications.push(application.clone());
                Ok(application)
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::ApplicationCreated, EntityType::Application)
                    .entity(application.id)
                    .payload(json!({ "gigId": gig_id, "status": application.status }))
                    .context(ctx),
            )
            .await?;

        Ok(application)
    }

    /// pending -> accepted; a published gig follows to `accepted`.
    pub async fn accept_application(&self, id: u64, ctx: &AuditContext) -> Result<Application> {
        let (application, from, gig_change) = self
            .file
            .update(|data| {
                let application = data
                    .applications
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| AppError::NotFound("Candidatura non trovata".into()))?;
                if application.status != ApplicationStatus::Pending {
                    return Err(AppError::Conflict("Transizione non valida".into()));
                }
                let from = application.status;
                application.status = ApplicationStatus::Accepted;
                let application = application.clone();

                let gig_change = data
                    .gigs
                    .iter_mut()
                    .find(|g| g.id == application.gig_id)
                    .map(|gig| {
                        let gig_from = gig.status;
                        if gig.status == GigStatus::Published {
                            gig.status = GigStatus::Accepted;
                        }
                        gig.updated_at = Utc::now();
                        (gig.id, gig_from, gig.status)
                    });

                Ok((application, from, gig_change))
            })
            .await?;

        if let Some((gig_id, gig_from, gig_to)) = gig_change {
            self.audit
                .log(
                    AuditEvent::new(AuditAction::GigAccepted, EntityType::Gig)
                        .entity(gig_id)
                        .payload(json!({ "fromStatus": gig_from, "toStatus": gig_to }))
                        .context(ctx),
                )
                .await?;
        }

        self.audit
            .log(
                AuditEvent::new(AuditAction::ApplicationAccepted, EntityType::Application)
                    .entity(application.id)
                    .payload(json!({
                        "gigId": application.gig_id,
                        "fromStatus": from,
                        "toStatus": application.status,
                    }))
                    .context(ctx),
            )
            .await?;

        Ok(application)
    }

    /// accepted -> completed, by the application's own worker. The gig moves
    /// to `completed` and receives its policy/engagement stamps.
    pub async fn complete_application(
        &self,
        id: u64,
        worker_id: &str,
        ctx: &AuditContext,
    ) -> Result<Application> {
        let (application, from, gig_change) = self
            .file
            .update(|data| {
                let application = data
                    .applications
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| AppError::NotFound("Candidatura non trovata".into()))?;
                if application.worker_id != worker_id {
                    return Err(AppError::Forbidden("Non autorizzato".into()));
                }
                if application.status != ApplicationStatus::Accepted {
                    return Err(AppError::Conflict("Transizione non valida".into()));
                }
                let from = application.status;
                application.status = ApplicationStatus::Completed;
                let application = application.clone();

                let gig_change = data
                    .gigs
                    .iter_mut()
                    .find(|g| g.id == application.gig_id)
                    .map(|gig| {
                        let gig_from = gig.status;
                        let gig_id = gig.id;
                        gig.status = GigStatus::Completed;
                        gig.policy_snapshot_id
                            .get_or_insert_with(|| format!("pol_{gig_id}"));
                        gig.engagement_id
                            .get_or_insert_with(|| format!("eng_{gig_id}"));
                        gig.updated_at = Utc::now();
                        (gig.id, gig_from, gig.status)
                    });

                Ok((application, from, gig_change))
            })
            .await?;

        if let Some((gig_id, gig_from, gig_to)) = gig_change {
            self.audit
                .log(
                    AuditEvent::new(AuditAction::GigCompleted, EntityType::Gig)
                        .entity(gig_id)
                        .payload(json!({ "fromStatus": gig_from, "toStatus": gig_to }))
                        .context(ctx),
                )
                .await?;
        }

        self.audit
            .log(
                AuditEvent::new(AuditAction::ApplicationCompleted, EntityType::Application)
                    .entity(application.id)
                    .payload(json!({
                        "gigId": application.gig_id,
                        "fromStatus": from,
                        "toStatus": application.status,
                    }))
                    .context(ctx),
            )
            .await?;

        Ok(application)
    }

    /// completed -> settled; stamps the payment confirmation time.
    pub async fn settle_gig(&self, id: u64, ctx: &AuditContext) -> Result<Gig> {
        let (gig, from) = self
            .file
            .update(|data| {
                let gig = data
                    .gigs
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| AppError::NotFound("Gig non trovato".into()))?;
                if gig.status != GigStatus::Completed {
                    return Err(AppError::Conflict("Transizione non valida".into()));
                }
                let from = gig.status;
                let now = Utc::now();
                gig.status = GigStatus::Settled;
                gig.payment_confirmed_at.get_or_insert(now);
                gig.updated_at = now;
                Ok((gig.clone(), from))
            })
            .await?;

        self.audit
            .log(
                AuditEvent::new(AuditAction::GigSettled, EntityType::Gig)
                    .entity(gig.id)
                    .payload(json!({ "fromStatus": from, "toStatus": gig.status }))
                    .context(ctx),
            )
            .await?;

        Ok(gig)
    }

    /// Settlement records for completed and settled gigs.
    pub async fn list_history(&self) -> Vec<SettlementRecord> {
        let data = self.file.load().await;
        data.gigs
            .iter()
            .filter(|gig| matches!(gig.status, GigStatus::Completed | GigStatus::Settled))
            .map(|gig| SettlementRecord {
                gig_id: gig.id,
                title: gig.title.clone(),
                policy_snapshot_id: gig.policy_snapshot_ref(),
                engagement_id: gig.engagement_ref(),
                compensation: gig.pay_amount,
                currency: gig.currency.clone(),
                preauthorized_at: gig.preauthorized_at.unwrap_or(gig.updated_at),
                payment_confirmed_at: gig
                    .payment_confirmed_at
                    .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                    .unwrap_or_default(),
            })
            .collect()
    }
}
