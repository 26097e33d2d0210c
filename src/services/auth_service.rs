//! Caller identity resolution against the external auth backend.
//!
//! Tokens are opaque here: the only validation is asking the backend who the
//! bearer is. When the backend cannot resolve the caller, the audit context
//! falls back to the raw token so actions still leave a trace.

use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::audit::AuditContext;
use crate::models::user::AuthUser;

/// HTTP client timeout in seconds
const HTTP_TIMEOUT_SECS: u64 = 10;

pub struct BackendAuth {
    client: Client,
    origin: String,
}

impl BackendAuth {
    pub fn new(origin: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("morphema-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            origin: origin.into(),
        }
    }

    /// Resolve the caller via the backend's `/api/auth/me`.
    ///
    /// Missing credentials, an unreachable backend and a backend rejection
    /// all read as `Unauthorized`, except an explicit 403 which stays 403.
    pub async fn fetch_user(&self, headers: &HeaderMap) -> Result<AuthUser> {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let response = self
            .client
            .get(format!("{}/api/auth/me", self.origin))
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|_| AppError::Unauthorized)?;

        match response.status() {
            status if status.is_success() => response
                .json::<AuthUser>()
                .await
                .map_err(|_| AppError::Unauthorized),
            reqwest::StatusCode::FORBIDDEN => Err(AppError::Forbidden("Forbidden".into())),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Resolve the caller and require the admin role.
    pub async fn require_admin(&self, headers: &HeaderMap) -> Result<AuthUser> {
        let user = self.fetch_user(headers).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Forbidden".into()));
        }
        Ok(user)
    }

    /// Build the audit context for a request: backend-resolved identity when
    /// available, otherwise the raw bearer token as the actor id.
    pub async fn audit_context(&self, headers: &HeaderMap) -> AuditContext {
        let (actor_user_id, actor_role) = match self.fetch_user(headers).await {
            Ok(user) => (Some(user.id.to_string()), Some(user.role)),
            Err(_) => (bearer_token(headers), None),
        };

        AuditContext {
            actor_user_id,
            actor_role,
            ip: header_value(headers, "x-forwarded-for"),
            user_agent: header_value(headers, "user-agent"),
        }
    }
}

/// The Authorization header value with a leading `Bearer ` stripped.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => value[7..].trim(),
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
