//! Morphema Backend - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use morphema_backend::api::{routes::create_router, AppState, SharedState};
use morphema_backend::error::Result;
use morphema_backend::{telemetry, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing (with OTLP export when configured)
    let otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let _otel_guard = telemetry::init_tracing(otel_endpoint.as_deref(), "morphema-backend");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        backend_origin = %config.backend_origin,
        "Starting Morphema backend"
    );

    let state: SharedState = Arc::new(AppState::new(config.clone()));

    // The demo frontend runs on its own origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = config.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Morphema API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
