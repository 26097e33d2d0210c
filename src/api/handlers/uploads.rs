//! Document upload handler (identity documents, JPG/PNG only).

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::fs;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::services::audit_service::{AuditAction, AuditEvent, EntityType};

/// Extra room for multipart boundaries and headers on top of the file cap.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create upload routes. The body limit sits above the file cap so
/// oversized files produce the proper 413 instead of a truncated read.
pub fn router(max_upload_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: Uuid,
    pub url: String,
}

/// Store an uploaded document
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing or empty file"),
        (status = 413, description = "File exceeds the size cap"),
        (status = 415, description = "Not a JPG or PNG")
    )
)]
pub async fn upload(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Richiesta non valida".to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::PayloadTooLarge("File troppo grande".to_string()))?;
            file = Some((file_name, content_type, data));
            break;
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::Validation("File mancante".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("File vuoto".to_string()));
    }
    let ext = extension_for(&file_name, &content_type).ok_or_else(|| {
        AppError::UnsupportedMedia("Formato non supportato. Usa JPG o PNG.".to_string())
    })?;
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge("File troppo grande".to_string()));
    }

    let file_id = Uuid::new_v4();
    let stored_name = format!("{file_id}{ext}");
    fs::create_dir_all(&state.config.uploads_dir).await?;
    fs::write(state.config.uploads_dir.join(&stored_name), &data).await?;

    let ctx = state.auth.audit_context(&headers).await;
    state
        .audit
        .log(
            AuditEvent::new(AuditAction::Upload, EntityType::Upload)
                .entity(file_id)
                .payload(json!({
                    "fileName": stored_name,
                    "size": data.len(),
                    "mime": content_type,
                }))
                .context(&ctx),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_id,
            url: format!("/uploads/{stored_name}"),
        }),
    ))
}

/// Allowed extension for the upload, from the file name first, then the
/// declared MIME type. `None` means the type is not accepted.
fn extension_for(file_name: &str, content_type: &str) -> Option<&'static str> {
    let by_name = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match by_name.as_deref() {
        Some("jpg") => return Some(".jpg"),
        Some("jpeg") => return Some(".jpeg"),
        Some("png") => return Some(".png"),
        _ => {}
    }
    match content_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        _ => None,
    }
}
