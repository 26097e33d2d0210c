//! Fallback proxy handler: everything under `/api` that no local route
//! claims is forwarded to the external backend (auth, onboarding, consents).

use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request, State},
    http::Response,
};

use crate::api::SharedState;
use crate::error::{AppError, Result};

/// Cap on buffered proxy bodies.
const PROXY_BODY_LIMIT: usize = 50 * 1024 * 1024;

pub async fn forward(
    State(state): State<SharedState>,
    OriginalUri(uri): OriginalUri,
    request: Request,
) -> Result<Response<Body>> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, PROXY_BODY_LIMIT)
        .await
        .map_err(|_| AppError::Validation("Richiesta non valida".to_string()))?;

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    tracing::debug!(method = %parts.method, path = %path_and_query, "Forwarding to backend");

    state
        .proxy
        .forward(parts.method, path_and_query, &parts.headers, bytes)
        .await
}
