//! Local admin user cache.
//!
//! Not an account system: a side-cache of actors seen in audit events, so
//! the admin console can list and disable them.

use std::path::Path;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::user::AdminUser;
use crate::store::JsonFile;

pub struct UserService {
    file: JsonFile<Vec<AdminUser>>,
}

impl UserService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("users.json")),
        }
    }

    /// Insert or refresh a user record. Existing email/role survive when the
    /// incoming event carries none.
    pub async fn upsert(
        &self,
        id: &str,
        email: Option<String>,
        role: Option<String>,
    ) -> Result<AdminUser> {
        self.file
            .update(|users| {
                let now = Utc::now();
                if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                    if email.is_some() {
                        user.email = email.clone();
                    }
                    if role.is_some() {
                        user.role = role.clone();
                    }
                    user.updated_at = now;
                    return Ok(user.clone());
                }
                let user = AdminUser {
                    id: id.to_string(),
                    email: email.clone(),
                    role: role.clone(),
                    disabled: false,
                    created_at: now,
                    updated_at: now,
                };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    pub async fn list(&self) -> Vec<AdminUser> {
        self.file.load().await
    }

    /// Flag a user as disabled. Idempotent; local effect only.
    pub async fn disable(&self, id: &str) -> Result<AdminUser> {
        self.file
            .update(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| AppError::NotFound("Utente non trovato".into()))?;
                user.disabled = true;
                user.updated_at = Utc::now();
                Ok(user.clone())
            })
            .await
    }
}
