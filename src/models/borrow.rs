use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::timestamp;

/// Status literal as stored by the server.
///
/// `Overdue` is only ever read, never written: some server builds
/// materialise it, others don't. Display code goes through
/// [`crate::domain::status::display_status`] instead of matching on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredStatus {
    Borrowed,
    Returned,
    Overdue,
}

impl StoredStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Borrowed => "BORROWED",
            Self::Returned => "RETURNED",
            Self::Overdue => "OVERDUE",
        }
    }
}

impl fmt::Display for StoredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoredStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BORROWED" => Ok(Self::Borrowed),
            "RETURNED" => Ok(Self::Returned),
            "OVERDUE" => Ok(Self::Overdue),
            other => Err(format!("unknown borrow status '{other}'")),
        }
    }
}

impl Serialize for StoredStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StoredStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowedItemRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowerRef {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowLog {
    pub id: i64,
    pub item_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub admin_id: Option<i64>,
    pub quantity_borrowed: i64,
    #[serde(with = "timestamp")]
    pub borrow_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub expected_return_date: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub actual_return_date: Option<DateTime<Utc>>,
    pub status: StoredStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub item: Option<BorrowedItemRef>,
    #[serde(default)]
    pub user: Option<BorrowerRef>,
}

impl BorrowLog {
    #[must_use]
    pub fn item_name(&self) -> Option<&str> {
        self.item.as_ref().map(|i| i.name.as_str())
    }

    #[must_use]
    pub fn borrower_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.full_name.as_str())
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        self.item
            .as_ref()
            .and_then(|i| i.unit.as_deref())
            .unwrap_or("")
    }
}

/// Payload for `POST /borrow-logs`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBorrowLog {
    pub item_id: i64,
    pub user_id: i64,
    pub admin_id: i64,
    pub quantity_borrowed: i64,
    #[serde(with = "timestamp")]
    pub expected_return_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `POST /borrow-logs/{id}/return`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReturnRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
