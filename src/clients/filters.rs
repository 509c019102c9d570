//! Query filters for list endpoints.
//!
//! Filters are applied server-side; unset fields are not sent at all.

use url::Url;

use crate::models::Condition;

/// Filters for `GET /items`. All set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub storage_location: Option<String>,
    pub condition: Option<Condition>,
    pub low_stock: bool,
    pub borrowable_only: bool,
}

impl ItemFilter {
    #[must_use]
    pub fn borrowable() -> Self {
        Self {
            borrowable_only: true,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, url: &mut Url) {
        let mut pairs = Vec::new();
        if let Some(search) = non_blank(self.search.as_deref()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(location) = non_blank(self.storage_location.as_deref()) {
            pairs.push(("storage_location", location.to_string()));
        }
        if let Some(condition) = self.condition {
            pairs.push(("condition", condition.as_str().to_string()));
        }
        if self.low_stock {
            pairs.push(("low_stock", "true".to_string()));
        }
        if self.borrowable_only {
            pairs.push(("borrowable_only", "true".to_string()));
        }
        append_query(url, &pairs);
    }
}

/// Status choices for the borrow log filter.
///
/// `Overdue` is not a stored status; it is sent as `overdue_only=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Borrowed,
    Returned,
    Overdue,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "borrowed" => Ok(Self::Borrowed),
            "returned" => Ok(Self::Returned),
            "overdue" => Ok(Self::Overdue),
            other => Err(format!(
                "unknown status '{other}' (expected borrowed, returned or overdue)"
            )),
        }
    }
}

/// Filters for `GET /borrow-logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowLogFilter {
    pub status: Option<StatusFilter>,
    pub user_id: Option<i64>,
    pub item_id: Option<i64>,
    pub overdue_only: bool,
}

impl BorrowLogFilter {
    #[must_use]
    pub fn overdue() -> Self {
        Self {
            overdue_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, url: &mut Url) {
        let mut pairs = Vec::new();
        match self.status {
            Some(StatusFilter::Borrowed) => pairs.push(("status", "BORROWED".to_string())),
            Some(StatusFilter::Returned) => pairs.push(("status", "RETURNED".to_string())),
            Some(StatusFilter::Overdue) | None => {}
        }
        if let Some(id) = self.user_id {
            pairs.push(("user_id", id.to_string()));
        }
        if let Some(id) = self.item_id {
            pairs.push(("item_id", id.to_string()));
        }
        if self.overdue_only || self.status == Some(StatusFilter::Overdue) {
            pairs.push(("overdue_only", "true".to_string()));
        }
        append_query(url, &pairs);
    }
}

/// Appends `pairs` to the query. No pairs leaves the URL without a `?`.
fn append_query(url: &mut Url, pairs: &[(&str, String)]) {
    if pairs.is_empty() {
        return;
    }
    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
