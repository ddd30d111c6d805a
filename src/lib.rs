// ============================================================================
// cartlist library
// ============================================================================

pub mod client;
pub mod config;
pub mod core;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use client::{ApiClient, ClientError, ClientState, ListController, SyncStrategy};
pub use config::AppConfig;
pub use core::{Item, ItemDraft, ItemPatch, Quantity, StoreError};
pub use storage::{InMemoryStore, ItemStore, JsonFileStore};
pub use web::{AppState, build_router};
