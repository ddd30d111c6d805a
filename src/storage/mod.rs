pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::core::{Item, ItemPatch, Result};
use async_trait::async_trait;

/// Storage contract for the item collection.
///
/// Implementations keep file-array order: `append` adds at the end, `replace`
/// and `update` overwrite in place, `remove` drops the entry.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Full collection in stored order.
    async fn list(&self) -> Result<Vec<Item>>;

    async fn append(&self, item: Item) -> Result<Item>;

    /// Overwrite the item with `id`. The stored id is preserved.
    async fn replace(&self, id: &str, item: Item) -> Result<Item>;

    /// Apply `patch` to the current value of `id` as a single critical section.
    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Item>;

    async fn remove(&self, id: &str) -> Result<Item>;
}
