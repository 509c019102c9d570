use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::category::Category;
use super::timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Good,
    ForDisposal,
    Expired,
}

impl Condition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::ForDisposal => "for_disposal",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "GOOD",
            Self::ForDisposal => "FOR DISPOSAL",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "good" => Ok(Self::Good),
            "for_disposal" => Ok(Self::ForDisposal),
            "expired" => Ok(Self::Expired),
            other => Err(format!(
                "unknown condition '{other}' (expected good, for_disposal or expired)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category: Option<Category>,
    pub quantity: i64,
    pub available_quantity: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub min_stock_level: i64,
    #[serde(default, with = "timestamp::option")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_borrowable: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_unit() -> String {
    crate::constants::defaults::UNIT.to_string()
}

const fn default_true() -> bool {
    true
}

impl Item {
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Form payload for creating or editing an item.
///
/// Only fields that are set are submitted. `image` is a local file that is
/// uploaded alongside the form.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub storage_location: Option<String>,
    pub condition: Option<Condition>,
    pub min_stock_level: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub is_borrowable: Option<bool>,
    pub image: Option<PathBuf>,
}

impl ItemDraft {
    /// Draft for a new item with the form defaults filled in.
    #[must_use]
    pub fn new_item(name: impl Into<String>, category_id: i64, quantity: i64) -> Self {
        use crate::constants::defaults;

        Self {
            name: Some(name.into()),
            category_id: Some(category_id),
            quantity: Some(quantity),
            unit: Some(defaults::UNIT.to_string()),
            condition: Some(Condition::Good),
            min_stock_level: Some(defaults::MIN_STOCK_LEVEL),
            is_borrowable: Some(true),
            ..Self::default()
        }
    }

    /// Text fields of the multipart form, skipping unset and empty values.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();

        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value
                && !v.trim().is_empty()
            {
                fields.push((key, v));
            }
        };

        push("name", self.name.clone());
        push("description", self.description.clone());
        push("category_id", self.category_id.map(|v| v.to_string()));
        push("quantity", self.quantity.map(|v| v.to_string()));
        push("unit", self.unit.clone());
        push("storage_location", self.storage_location.clone());
        push("condition", self.condition.map(|c| c.as_str().to_string()));
        push("min_stock_level", self.min_stock_level.map(|v| v.to_string()));
        push(
            "expiry_date",
            self.expiry_date.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        push("is_borrowable", self.is_borrowable.map(|b| b.to_string()));

        fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parsing() {
        assert_eq!("good".parse::<Condition>().unwrap(), Condition::Good);
        assert_eq!(
            "For Disposal".parse::<Condition>().unwrap(),
            Condition::ForDisposal
        );
        assert_eq!("EXPIRED".parse::<Condition>().unwrap(), Condition::Expired);
        assert!("broken".parse::<Condition>().is_err());
    }

    #[test]
    fn test_condition_display() {
        assert_eq!(Condition::ForDisposal.to_string(), "FOR DISPOSAL");
        assert_eq!(Condition::ForDisposal.as_str(), "for_disposal");
    }

    #[test]
    fn test_item_deserialization_defaults() {
        let json = r#"{
            "id": 3,
            "name": "Beaker 250mL",
            "quantity": 12,
            "available_quantity": 10,
            "expiry_date": null,
            "category": {"id": 1, "name": "Glassware"}
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit, "pieces");
        assert_eq!(item.condition, Condition::Good);
        assert!(item.is_borrowable);
        assert!(item.expiry_date.is_none());
        assert_eq!(item.category_name(), Some("Glassware"));
    }

    #[test]
    fn test_draft_skips_empty_fields() {
        let draft = ItemDraft {
            name: Some("Flask".to_string()),
            description: Some("   ".to_string()),
            quantity: Some(0),
            ..ItemDraft::default()
        };

        let fields = draft.form_fields();
        assert_eq!(
            fields,
            vec![("name", "Flask".to_string()), ("quantity", "0".to_string())]
        );
    }

    #[test]
    fn test_new_item_defaults() {
        let draft = ItemDraft::new_item("Pipette", 2, 20);
        assert_eq!(draft.unit.as_deref(), Some("pieces"));
        assert_eq!(draft.min_stock_level, Some(5));
        assert_eq!(draft.is_borrowable, Some(true));
        assert_eq!(draft.condition, Some(Condition::Good));
    }
}
