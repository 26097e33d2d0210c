//! Passthrough proxy to the external backend.
//!
//! API calls this service does not handle locally (auth, onboarding,
//! consents, ...) are forwarded verbatim to the backend origin. The body is
//! buffered, hop-by-hop request headers are dropped, and CORS headers are
//! stripped from the upstream response since the reply is same-origin here.

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Response};
use bytes::Bytes;
use reqwest::Client;

use crate::error::{AppError, Result};

/// HTTP client timeout in seconds
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Request headers that must not be forwarded upstream.
const HOP_BY_HOP_REQUEST_HEADERS: [&str; 3] = ["host", "connection", "content-length"];

/// Response headers dropped before relaying: CORS headers from the upstream
/// conflict with the same-origin reply, and framing headers no longer match
/// the buffered body.
const STRIPPED_RESPONSE_HEADERS: [&str; 6] = [
    "access-control-allow-origin",
    "access-control-allow-credentials",
    "access-control-allow-headers",
    "access-control-allow-methods",
    "content-length",
    "transfer-encoding",
];

pub struct ProxyService {
    client: Client,
    origin: String,
}

impl ProxyService {
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

    /// Forward a request to `{origin}{path_and_query}` and relay the
    /// upstream response.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response<Body>> {
        let url = format!("{}{}", self.origin, path_and_query);

        let mut upstream_headers = headers.clone();
        for name in HOP_BY_HOP_REQUEST_HEADERS {
            upstream_headers.remove(name);
        }

        let upstream = self
            .client
            .request(method, &url)
            .headers(upstream_headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        for name in STRIPPED_RESPONSE_HEADERS {
            response_headers.remove(name);
        }
        let bytes = upstream.bytes().await?;

        let mut builder = Response::builder().status(status);
        if let Some(headers) = builder.headers_mut() {
            *headers = response_headers;
        }
        builder
            .body(Body::from(bytes))
            .map_err(|e| AppError::Internal(format!("Failed to build proxy response: {e}")))
    }
}
