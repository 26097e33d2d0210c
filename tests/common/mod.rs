//! Shared test scaffolding.

#![allow(dead_code)]

use std::sync::Arc;

use morphema_backend::api::routes::create_router;
use morphema_backend::api::{AppState, SharedState};
use morphema_backend::models::audit::AuditContext;
use morphema_backend::Config;
use tempfile::TempDir;

/// A fully wired [`AppState`] backed by a throwaway data directory.
///
/// The configured backend origin points at an unroutable port so auth
/// lookups fail fast instead of hanging on a real network call.
pub struct TestContext {
    pub state: SharedState,
    _data_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_backend("http://127.0.0.1:9")
    }

    /// Context pointed at a real (usually stubbed) auth backend origin.
    pub fn with_backend(origin: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: dir.path().join("data"),
            audit_data_dir: dir.path().join("data"),
            uploads_dir: dir.path().join("uploads"),
            backend_origin: origin.to_string(),
            max_upload_bytes: 1024 * 1024,
        };

        Self {
            state: Arc::new(AppState::new(config)),
            _data_dir: dir,
        }
    }

    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }
}

/// Stand-in for the external auth backend: serves `/api/auth/me` with a
/// fixed identity on an ephemeral port. Returns the origin to point at.
pub async fn spawn_auth_stub(user: serde_json::Value) -> String {
    use axum::{routing::get, Json, Router};

    let app = Router::new().route("/api/auth/me", get(move || async move { Json(user) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind auth stub");
    let addr = listener.local_addr().expect("auth stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{addr}")
}

/// Audit context for a named actor.
pub fn actor(user_id: &str, role: &str) -> AuditContext {
    AuditContext {
        actor_user_id: Some(user_id.to_string()),
        actor_role: Some(role.to_string()),
        ip: Some("127.0.0.1".to_string()),
        user_agent: Some("morphema-tests".to_string()),
    }
}
