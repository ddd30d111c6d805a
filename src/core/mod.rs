pub mod error;
pub mod item;

pub use error::{Result, StoreError};
pub use item::{
    DEFAULT_CATEGORY, Item, ItemDraft, ItemPatch, NewItem, Quantity, coerce_number, coerce_text,
};
