use super::ItemStore;
use crate::core::{Item, ItemPatch, Result, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Volatile store with the same semantics as the JSON file store.
#[derive(Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

fn position(items: &[Item], id: &str) -> Result<usize> {
    items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn append(&self, item: Item) -> Result<Item> {
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn replace(&self, id: &str, mut item: Item) -> Result<Item> {
        let mut items = self.items.write().await;
        let idx = position(&items, id)?;
        item.id = id.to_string();
        items[idx] = item.clone();
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Item> {
        let mut items = self.items.write().await;
        let idx = position(&items, id)?;
        let updated = patch.apply(&items[idx]);
        items[idx] = updated.clone();
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<Item> {
        let mut items = self.items.write().await;
        let idx = position(&items, id)?;
        Ok(items.remove(idx))
    }
}
