use chrono::{DateTime, Utc};

use super::{ServiceResult, Session};
use crate::clients::{BorrowLogFilter, ItemFilter};
use crate::models::{BorrowLog, DashboardStats, Item};

#[derive(Debug, Clone)]
pub struct Report {
    pub stats: DashboardStats,
    pub low_stock: Vec<Item>,
    pub expired: Vec<Item>,
    /// Present for admins only.
    pub overdue: Option<Vec<BorrowLog>>,
}

pub struct ReportService<'a> {
    session: &'a Session,
}

impl<'a> ReportService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Loads every report section with one concurrent round of requests.
    pub async fn load(&self, now: DateTime<Utc>) -> ServiceResult<Report> {
        let user = self.session.require_user()?;
        let api = self.session.api();
        let all_items = ItemFilter::default();

        let (stats, items, overdue) = if user.role.is_admin() {
            let overdue_filter = BorrowLogFilter::overdue();
            let (stats, items, overdue) = tokio::try_join!(
                api.dashboard_stats(),
                api.list_items(&all_items),
                api.list_borrow_logs(&overdue_filter),
            )?;
            (stats, items, Some(overdue))
        } else {
            let (stats, items) =
                tokio::try_join!(api.dashboard_stats(), api.list_items(&all_items))?;
            (stats, items, None)
        };

        Ok(build_report(stats, items, overdue, now))
    }
}

fn build_report(
    stats: DashboardStats,
    items: Vec<Item>,
    overdue: Option<Vec<BorrowLog>>,
    now: DateTime<Utc>,
) -> Report {
    let low_stock = items.iter().filter(|i| i.is_low_stock()).cloned().collect();
    let expired = items
        .into_iter()
        .filter(|i| i.needs_disposal_review(now))
        .collect();

    Report {
        stats,
        low_stock,
        expired,
        overdue,
    }
}
