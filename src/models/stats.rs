use serde::{Deserialize, Serialize};

/// Aggregate counters from `GET /dashboard/stats`.
///
/// The server scopes borrow counters to the caller for viewer accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardStats {
    pub total_items: i64,
    pub total_categories: i64,
    pub low_stock_items: i64,
    pub expired_items: i64,
    pub total_borrowed_items: i64,
    pub overdue_borrows: i64,
    pub total_users: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counters_default_to_zero() {
        let stats: DashboardStats = serde_json::from_str(r#"{"total_items": 42}"#).unwrap();
        assert_eq!(stats.total_items, 42);
        assert_eq!(stats.overdue_borrows, 0);
        assert_eq!(stats.total_users, 0);
    }
}
