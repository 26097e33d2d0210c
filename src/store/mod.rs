//! Whole-file JSON persistence.
//!
//! Each store is a single pretty-printed JSON file read and rewritten in
//! full on every mutation. A missing or unreadable file reads as the
//! default value. An in-process mutex serializes read-modify-write cycles;
//! there is no multi-writer safety beyond that, by the demo storage model.

use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::Result;

/// A JSON file holding a single value of type `T`.
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Read the current value. Missing or corrupt files read as `T::default()`.
    pub async fn load(&self) -> T {
        match fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_default(),
            Err(_) => T::default(),
        }
    }

    /// Apply `f` to the stored value under the write lock and persist the
    /// result. If `f` fails, the file is left untouched.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let _guard = self.lock.lock().await;
        let mut value = self.load().await;
        let out = f(&mut value)?;
        self.persist(&value).await?;
        Ok(out)
    }

    async fn persist(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(value)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// Next max+1 identifier over the ids already in use.
pub fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}
