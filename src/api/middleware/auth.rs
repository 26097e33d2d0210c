//! Authentication middleware.
//!
//! Tokens are opaque bearer credentials validated by the external backend.
//! Two gates exist:
//! - `require_bearer`: the request must carry a non-empty `Authorization`
//!   header (passthrough, no local validation)
//! - `admin_middleware`: the caller must resolve to an admin via the
//!   backend's `/api/auth/me`

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::SharedState;
use crate::error::AppError;

/// Reject requests without an `Authorization` header.
pub async fn require_bearer(request: Request, next: Next) -> Response {
    let has_token = request
        .headers()
        .get(AUTHORIZATION)
        .map_or(false, |v| !v.as_bytes().is_empty());

    if !has_token {
        return AppError::Unauthorized.into_response();
    }
    next.run(request).await
}

/// Resolve the caller against the backend and require the admin role.
pub async fn admin_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    match state.auth.require_admin(request.headers()).await {
        Ok(_) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
