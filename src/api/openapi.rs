//! OpenAPI document assembly.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::audit::{AuditEntry, AuditPage};
use crate::models::gig::{Gig, GigStatus, GigSummary, SettlementRecord};
use crate::models::user::AdminUser;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Morphema API",
        description = "Gig marketplace for venues and occasional workers (art. 2222 c.c.)"
    ),
    paths(
        handlers::health::health_check,
        handlers::gigs::list_published,
        handlers::gigs::apply,
        handlers::venue::list_gigs,
        handlers::venue::create_gig,
        handlers::venue::update_gig,
        handlers::venue::delete_gig,
        handlers::venue::publish_gig,
        handlers::venue::settle_gig,
        handlers::venue::list_gig_applications,
        handlers::venue::accept_application,
        handlers::venue::history,
        handlers::applications::list_mine,
        handlers::applications::complete,
        handlers::admin::query_audit,
        handlers::admin::list_users,
        handlers::admin::disable_user,
        handlers::admin::list_gigs,
        handlers::audit::report,
        handlers::uploads::upload,
    ),
    components(schemas(
        Gig,
        GigStatus,
        GigSummary,
        SettlementRecord,
        Application,
        ApplicationStatus,
        AuditEntry,
        AuditPage,
        AdminUser,
        handlers::gigs::ApplyRequest,
        handlers::venue::CreateGigRequest,
        handlers::venue::UpdateGigRequest,
        handlers::audit::ReportAuditRequest,
        handlers::uploads::UploadResponse,
        handlers::health::HealthResponse,
        handlers::health::HealthChecks,
        handlers::health::CheckStatus,
    )),
    tags(
        (name = "gigs", description = "Worker-facing gig board"),
        (name = "venue", description = "Venue gig management"),
        (name = "worker", description = "Worker applications"),
        (name = "admin", description = "Admin console"),
        (name = "audit", description = "Audit trail"),
        (name = "uploads", description = "Document uploads"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI spec served at `/api/openapi.json`.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_all_local_routes() {
        let doc = build_openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/health",
            "/api/gigs",
            "/api/gigs/{id}/apply",
            "/api/venue/gigs",
            "/api/venue/gigs/{id}/publish",
            "/api/venue/gigs/{id}/settle",
            "/api/admin/audit",
            "/api/audit/log",
            "/api/uploads",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
