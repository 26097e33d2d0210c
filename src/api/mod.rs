//! API module - HTTP handlers and middleware.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::services::audit_service::AuditService;
use crate::services::auth_service::BackendAuth;
use crate::services::proxy_service::ProxyService;
use crate::services::user_service::UserService;
use crate::services::venue_service::VenueService;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub venue: Arc<VenueService>,
    pub audit: Arc<AuditService>,
    pub users: Arc<UserService>,
    pub auth: Arc<BackendAuth>,
    pub proxy: Arc<ProxyService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let audit = Arc::new(AuditService::new(&config.audit_data_dir));
        let venue = Arc::new(VenueService::new(&config.data_dir, audit.clone()));
        let users = Arc::new(UserService::new(&config.data_dir));
        let auth = Arc::new(BackendAuth::new(config.backend_origin.clone()));
        let proxy = Arc::new(ProxyService::new(config.backend_origin.clone()));

        Self {
            config,
            venue,
            audit,
            users,
            auth,
            proxy,
        }
    }
}

pub type SharedState = Arc<AppState>;
