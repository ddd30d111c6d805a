//! Client side of the shopping list: a typed HTTP client for the REST API,
//! the local state container and the controller that ties them together.

pub mod api;
pub mod controller;
pub mod state;

pub use api::{ApiClient, ClientError};
pub use controller::{ListController, SyncStrategy};
pub use state::{ALL_CATEGORIES, Action, ClientState, Filters};
