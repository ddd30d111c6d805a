//! Local copy of the item list and the reducer that keeps it in sync with
//! server responses.

use crate::core::Item;

/// Category selection that matches every item.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub query: String,
    pub category: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl Filters {
    pub fn matches(&self, item: &Item) -> bool {
        let query = self.query.to_lowercase();
        let matches_query = [item.name.as_str(), item.category.as_str(), item.note.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&query));
        let matches_category =
            self.category == ALL_CATEGORIES || item.display_category() == self.category;
        matches_query && matches_category
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadStarted,
    Loaded(Vec<Item>),
    LoadFailed(String),
    Created(Item),
    Updated(Item),
    Deleted(String),
    StartEdit(Item),
    CancelEdit,
    SetQuery(String),
    SetCategory(String),
    ResetFilters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub items: Vec<Item>,
    pub loading: bool,
    /// Page-level error from the last load; empty when there is none.
    pub error: String,
    pub editing: Option<Item>,
    pub filters: Filters,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            // nothing has been fetched yet
            loading: true,
            error: String::new(),
            editing: None,
            filters: Filters::default(),
        }
    }
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::LoadStarted => self.loading = true,
            Action::Loaded(items) => {
                self.items = items;
                self.error.clear();
                self.loading = false;
            }
            Action::LoadFailed(message) => {
                self.error = message;
                self.loading = false;
            }
            Action::Created(item) => self.items.insert(0, item),
            Action::Updated(item) => {
                if let Some(slot) = self.items.iter_mut().find(|i| i.id == item.id) {
                    *slot = item;
                }
                self.editing = None;
            }
            Action::Deleted(id) => self.items.retain(|i| i.id != id),
            Action::StartEdit(item) => self.editing = Some(item),
            Action::CancelEdit => self.editing = None,
            Action::SetQuery(query) => self.filters.query = query,
            Action::SetCategory(category) => self.filters.category = category,
            Action::ResetFilters => self.filters = Filters::default(),
        }
    }

    /// `"All"` followed by every distinct category in order of first
    /// appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in &self.items {
            let category = item.display_category();
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
        categories
    }

    pub fn filtered(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| self.filters.matches(item))
            .collect()
    }
}
