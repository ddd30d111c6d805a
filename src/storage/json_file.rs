//! JSON document store.
//!
//! The whole collection lives in one pretty-printed JSON array. Every call
//! reads the full document; mutating calls rewrite it in full. A per-store
//! mutex serializes access so that read-modify-write cycles from concurrent
//! requests in this process never interleave. Other processes writing the same
//! file are not coordinated with.

use super::ItemStore;
use crate::core::{Item, ItemPatch, Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const EMPTY_DOCUMENT: &[u8] = b"[]";

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_document(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| {
                StoreError::Io(format!(
                    "Failed to create data directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }

        if !fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "creating empty item document");
            fs::write(&self.path, EMPTY_DOCUMENT).await.map_err(|err| {
                StoreError::Io(format!(
                    "Failed to create '{}': {}",
                    self.path.display(),
                    err
                ))
            })?;
        }
        Ok(())
    }

    /// Reads the collection. Content that is not a JSON array reads as
    /// empty. Inside an array, records that cannot be used are skipped and
    /// the rest are kept. Either way the raw bytes are returned alongside so
    /// they can be copied aside before the document is overwritten.
    async fn load(&self) -> Result<Document> {
        self.ensure_document().await?;

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "item document unreadable, treating as empty"
                );
                return Ok(Document::default());
            }
        };

        if bytes.trim_ascii().is_empty() {
            return Ok(Document::default());
        }

        let records = match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "item document is corrupt, treating as empty"
                );
                return Ok(Document {
                    items: Vec::new(),
                    damaged: Some(bytes),
                });
            }
        };

        let total = records.len();
        let items: Vec<Item> = records.into_iter().filter_map(Item::from_stored).collect();
        let skipped = total - items.len();
        if skipped > 0 {
            warn!(
                path = %self.path.display(),
                skipped,
                "skipping item records without a usable id or name"
            );
        }

        Ok(Document {
            items,
            damaged: (skipped > 0).then_some(bytes),
        })
    }

    async fn quarantine(&self, bytes: &[u8]) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "items.json".to_string());
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let target = self.path.with_file_name(format!("{file_name}.corrupt-{stamp}"));

        fs::write(&target, bytes).await.map_err(|err| {
            StoreError::Io(format!(
                "Failed to quarantine corrupt document to '{}': {}",
                target.display(),
                err
            ))
        })?;
        warn!(backup = %target.display(), "corrupt item document copied aside");
        Ok(())
    }

    /// Writes `items`, first copying a damaged original aside.
    async fn save(&self, items: &[Item], damaged: Option<&[u8]>) -> Result<()> {
        if let Some(original) = damaged {
            self.quarantine(original).await?;
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        atomic_write(&self.path, &bytes).await
    }
}

/// Decoded collection plus the original bytes when some of them were lost.
#[derive(Default)]
struct Document {
    items: Vec<Item>,
    damaged: Option<Vec<u8>>,
}

async fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).await.map_err(|err| {
        StoreError::Io(format!(
            "Failed to write temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;

    fs::rename(&tmp, path).await.map_err(|err| {
        StoreError::Io(format!(
            "Failed to rename temp file '{}' -> '{}': {}",
            tmp.display(),
            path.display(),
            err
        ))
    })?;
    Ok(())
}

fn position(items: &[Item], id: &str) -> Result<usize> {
    items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Item>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.items)
    }

    async fn append(&self, item: Item) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let Document { mut items, damaged } = self.load().await?;
        items.push(item.clone());
        self.save(&items, damaged.as_deref()).await?;
        Ok(item)
    }

    async fn replace(&self, id: &str, mut item: Item) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let Document { mut items, damaged } = self.load().await?;
        let idx = position(&items, id)?;
        item.id = id.to_string();
        items[idx] = item.clone();
        self.save(&items, damaged.as_deref()).await?;
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let Document { mut items, damaged } = self.load().await?;
        let idx = position(&items, id)?;
        let updated = patch.apply(&items[idx]);
        items[idx] = updated.clone();
        self.save(&items, damaged.as_deref()).await?;
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let Document { mut items, damaged } = self.load().await?;
        let idx = position(&items, id)?;
        let removed = items.remove(idx);
        self.save(&items, damaged.as_deref()).await?;
        Ok(removed)
    }
}
