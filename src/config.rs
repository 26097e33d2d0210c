//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default upload size cap: 10 MB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (host:port)
    pub bind_address: String,

    /// Directory holding the JSON store files (venue.json, users.json)
    pub data_dir: PathBuf,

    /// Directory holding audit.json (defaults to `data_dir`)
    pub audit_data_dir: PathBuf,

    /// Directory where uploaded files are written
    pub uploads_dir: PathBuf,

    /// Origin of the external auth backend, without a trailing `/api`
    pub backend_origin: String,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> crate::error::Result<Self> {
        let data_dir =
            PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
        let audit_data_dir = env::var("AUDIT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.clone());

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3001".into()),
            data_dir,
            audit_data_dir,
            uploads_dir: PathBuf::from(
                env::var("UPLOADS_DIR").unwrap_or_else(|_| "./public/uploads".to_string()),
            ),
            backend_origin: normalize_origin(
                &env::var("BACKEND_ORIGIN").unwrap_or_else(|_| "http://127.0.0.1:3000".into()),
            ),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

/// Normalize a backend origin: drop trailing slashes and a trailing `/api`
/// segment, so both `http://host:3000` and `http://host:3000/api/` work.
fn normalize_origin(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    match trimmed.strip_suffix("/api") {
        Some(origin) => origin.to_string(),
        None => trimmed.to_string(),
    }
}
