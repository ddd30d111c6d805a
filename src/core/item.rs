//! The shopping-list item and its normalization rules.
//!
//! Incoming payloads are loosely typed JSON. The helpers here coerce them into
//! values that always satisfy the item invariants: a non-empty trimmed name and
//! a positive finite quantity.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_CATEGORY: &str = "General";

/// Largest float that still maps onto an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

// Stored documents may carry numbers, `null` or other shapes where text is
// expected. These keep one odd field from rejecting the whole record.

fn text_or_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_text(&raw).unwrap_or_else(default_category))
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_text(&raw).unwrap_or_default())
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    coerce_text(&raw).ok_or_else(|| de::Error::custom("expected a string or number"))
}

/// Positive, finite item quantity.
///
/// Integral values serialize as JSON integers so that a stored `2` stays `2`
/// instead of turning into `2.0` on the next write.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    pub const ONE: Quantity = Quantity(1.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Coerces an arbitrary JSON value, returning `None` when it is not a
    /// positive number.
    pub fn from_json(value: &Value) -> Option<Self> {
        coerce_number(value).and_then(Self::new)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    fn is_integral(self) -> bool {
        self.0.fract() == 0.0 && self.0 <= MAX_EXACT_INTEGER
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.0 as u64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&raw).unwrap_or_default())
    }
}

/// Loose numeric conversion: numbers pass through, strings are parsed
/// (blank is zero), booleans are 1/0 and `null` is zero. Arrays and objects
/// are not numeric.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose text conversion used by partial updates. Scalars are rendered and
/// trimmed; `null`, arrays and objects yield `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "required_text")]
    pub id: String,
    #[serde(deserialize_with = "required_text")]
    pub name: String,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default = "default_category", deserialize_with = "text_or_category")]
    pub category: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub note: String,
}

impl Item {
    /// Decodes one stored record. Records without a usable id or a non-blank
    /// name are rejected; every other field falls back to its default.
    pub fn from_stored(value: Value) -> Option<Self> {
        serde_json::from_value::<Item>(value)
            .ok()
            .filter(|item| !item.id.is_empty() && !item.name.trim().is_empty())
    }

    /// Category as shown to users: an empty category reads as the default.
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }
}

/// A validated creation payload that only lacks an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub quantity: Quantity,
    pub category: String,
    pub note: String,
}

impl NewItem {
    pub fn into_item(self, id: String) -> Item {
        Item {
            id,
            name: self.name,
            quantity: self.quantity,
            category: self.category,
            note: self.note,
        }
    }
}

/// Normalized partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.note.is_none()
    }

    pub fn apply(&self, item: &Item) -> Item {
        let mut updated = item.clone();
        // a blank name would break the non-empty invariant
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            updated.name = name.trim().to_string();
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = quantity;
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(note) = &self.note {
            updated.note = note.clone();
        }
        updated
    }
}

/// Payload the client sends for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: Quantity,
    pub category: String,
    pub note: String,
}

impl From<&Item> for ItemDraft {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            category: item.category.clone(),
            note: item.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn milk() -> Item {
        Item {
            id: "a1".to_string(),
            name: "Milk".to_string(),
            quantity: Quantity::new(2.0).unwrap(),
            category: "Dairy".to_string(),
            note: "semi-skimmed".to_string(),
        }
    }

    #[test]
    fn quantity_rejects_non_positive_and_non_finite() {
        assert!(Quantity::new(0.0).is_none());
        assert!(Quantity::new(-3.0).is_none());
        assert!(Quantity::new(f64::NAN).is_none());
        assert!(Quantity::new(f64::INFINITY).is_none());
        assert_eq!(Quantity::new(0.5).map(Quantity::get), Some(0.5));
    }

    #[test]
    fn quantity_coerces_loose_json() {
        assert_eq!(Quantity::from_json(&json!(3)), Quantity::new(3.0));
        assert_eq!(Quantity::from_json(&json!(" 4 ")), Quantity::new(4.0));
        assert_eq!(Quantity::from_json(&json!(true)), Some(Quantity::ONE));
        assert_eq!(Quantity::from_json(&json!("")), None);
        assert_eq!(Quantity::from_json(&json!("abc")), None);
        assert_eq!(Quantity::from_json(&json!(null)), None);
        assert_eq!(Quantity::from_json(&json!([1])), None);
    }

    #[test]
    fn integral_quantity_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Quantity::new(2.0).unwrap()).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Quantity::new(1.5).unwrap()).unwrap(), "1.5");
        assert_eq!(Quantity::new(7.0).unwrap().to_string(), "7");
    }

    #[test]
    fn stored_item_fills_missing_fields_with_defaults() {
        let item: Item = serde_json::from_value(json!({ "id": "x", "name": "Eggs" })).unwrap();
        assert_eq!(item.quantity, Quantity::ONE);
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.note, "");

        let item: Item =
            serde_json::from_value(json!({ "id": "x", "name": "Eggs", "quantity": -2 })).unwrap();
        assert_eq!(item.quantity, Quantity::ONE);
    }

    #[test]
    fn stored_record_tolerates_odd_field_types() {
        let item = Item::from_stored(json!({
            "id": 7,
            "name": "Bread",
            "category": null,
            "note": ["x"]
        }))
        .unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.note, "");

        let item = Item::from_stored(json!({ "id": "1", "name": 5 })).unwrap();
        assert_eq!(item.name, "5");
    }

    #[test]
    fn stored_record_needs_id_and_name() {
        assert!(Item::from_stored(json!({ "name": "Milk" })).is_none());
        assert!(Item::from_stored(json!({ "id": "1" })).is_none());
        assert!(Item::from_stored(json!({ "id": "1", "name": "  " })).is_none());
        assert!(Item::from_stored(json!({ "id": null, "name": "Milk" })).is_none());
        assert!(Item::from_stored(json!(42)).is_none());
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let original = milk();
        let patch = ItemPatch {
            note: Some("whole".to_string()),
            ..ItemPatch::default()
        };

        let updated = patch.apply(&original);
        assert_eq!(updated.note, "whole");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.quantity, original.quantity);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.id, original.id);
    }

    #[test]
    fn patch_never_blanks_the_name() {
        let patch = ItemPatch {
            name: Some("   ".to_string()),
            ..ItemPatch::default()
        };
        assert_eq!(patch.apply(&milk()).name, "Milk");
    }

    #[test]
    fn text_coercion_renders_scalars() {
        assert_eq!(coerce_text(&json!("  Fruit ")), Some("Fruit".to_string()));
        assert_eq!(coerce_text(&json!(12)), Some("12".to_string()));
        assert_eq!(coerce_text(&json!(false)), Some("false".to_string()));
        assert_eq!(coerce_text(&json!(null)), None);
        assert_eq!(coerce_text(&json!({ "a": 1 })), None);
    }

    #[test]
    fn empty_category_displays_as_default() {
        let mut item = milk();
        item.category.clear();
        assert_eq!(item.display_category(), DEFAULT_CATEGORY);
    }
}
