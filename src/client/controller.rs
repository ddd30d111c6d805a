use tracing::debug;

use super::api::{ApiClient, Result};
use super::state::{Action, ClientState};
use crate::core::{Item, ItemDraft};

/// How local state is reconciled after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Merge the server response into the local list.
    #[default]
    Optimistic,
    /// Re-fetch the whole list.
    Refetch,
}

/// Drives the API client and applies the results to [`ClientState`].
///
/// Mutation failures are returned to the caller and leave the local state
/// untouched. Deletion assumes the caller already obtained confirmation.
pub struct ListController {
    api: ApiClient,
    state: ClientState,
    strategy: SyncStrategy,
}

impl ListController {
    pub fn new(api: ApiClient, strategy: SyncStrategy) -> Self {
        Self {
            api,
            state: ClientState::new(),
            strategy,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    /// Applies a purely local action such as a filter change.
    pub fn dispatch(&mut self, action: Action) {
        self.state.apply(action);
    }

    pub async fn load(&mut self) {
        self.state.apply(Action::LoadStarted);
        match self.api.list_items().await {
            Ok(items) => {
                debug!(count = items.len(), "items loaded");
                self.state.apply(Action::Loaded(items));
            }
            Err(err) => self.state.apply(Action::LoadFailed(err.to_string())),
        }
    }

    pub async fn add(&mut self, draft: &ItemDraft) -> Result<Item> {
        let created = self.api.create_item(draft).await?;
        match self.strategy {
            SyncStrategy::Optimistic => self.state.apply(Action::Created(created.clone())),
            SyncStrategy::Refetch => self.load().await,
        }
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, draft: &ItemDraft) -> Result<Item> {
        let updated = self.api.update_item(id, draft).await?;
        match self.strategy {
            SyncStrategy::Optimistic => self.state.apply(Action::Updated(updated.clone())),
            SyncStrategy::Refetch => {
                self.state.apply(Action::CancelEdit);
                self.load().await;
            }
        }
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.api.delete_item(id).await?;
        match self.strategy {
            SyncStrategy::Optimistic => self.state.apply(Action::Deleted(id.to_string())),
            SyncStrategy::Refetch => self.load().await,
        }
        Ok(())
    }
}
