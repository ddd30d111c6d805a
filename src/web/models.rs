//! Per-route request and response bodies.
//!
//! Request fields are kept as raw JSON so that loosely typed input (numbers
//! sent as strings, `null`, wrong types) reaches the normalization rules
//! instead of failing deserialization.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, ApiResult, INVALID_BODY_MESSAGE, NAME_REQUIRED_MESSAGE};
use crate::core::{DEFAULT_CATEGORY, Item, ItemPatch, NewItem, Quantity, coerce_text};

#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<Value>,
    pub quantity: Option<Value>,
    pub category: Option<Value>,
    pub note: Option<Value>,
}

impl CreateItemRequest {
    pub fn validate(self) -> ApiResult<NewItem> {
        let name = match &self.name {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(ApiError::validation(NAME_REQUIRED_MESSAGE)),
        };

        let quantity = self
            .quantity
            .as_ref()
            .and_then(Quantity::from_json)
            .unwrap_or_default();

        let category = match &self.category {
            Some(Value::String(category)) => category.trim().to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };

        let note = match &self.note {
            Some(Value::String(note)) => note.trim().to_string(),
            _ => String::new(),
        };

        Ok(NewItem {
            name,
            quantity,
            category,
            note,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<Value>,
    pub quantity: Option<Value>,
    pub category: Option<Value>,
    pub note: Option<Value>,
}

impl UpdateItemRequest {
    /// Blank names and invalid quantities are dropped so the stored values
    /// survive.
    pub fn into_patch(self) -> ItemPatch {
        ItemPatch {
            name: self
                .name
                .as_ref()
                .and_then(coerce_text)
                .filter(|name| !name.is_empty()),
            quantity: self.quantity.as_ref().and_then(Quantity::from_json),
            category: self.category.as_ref().and_then(coerce_text),
            note: self.note.as_ref().and_then(coerce_text),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub removed: Item,
}

/// Decodes a request body. An empty body reads as `{}`; anything other than
/// a JSON object is rejected.
pub fn parse_body<T>(bytes: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if bytes.trim_ascii().is_empty() {
        return Ok(T::default());
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(|_| ApiError::validation(INVALID_BODY_MESSAGE))?;
    if !value.is_object() {
        return Err(ApiError::validation(INVALID_BODY_MESSAGE));
    }
    serde_json::from_value(value).map_err(|_| ApiError::validation(INVALID_BODY_MESSAGE))
}
