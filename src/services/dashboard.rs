use super::{ServiceResult, Session};
use crate::clients::BorrowLogFilter;
use crate::constants::defaults;
use crate::domain::Dashboard;
use crate::models::BorrowLog;

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub dashboard: Dashboard,
    pub recent: Vec<BorrowLog>,
}

pub struct DashboardService<'a> {
    session: &'a Session,
}

impl<'a> DashboardService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn load(&self) -> ServiceResult<DashboardView> {
        let user = self.session.require_user()?;
        let api = self.session.api();
        let filter = BorrowLogFilter::default();

        let (stats, mut recent) =
            tokio::try_join!(api.dashboard_stats(), api.list_borrow_logs(&filter))?;

        recent.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date));
        recent.truncate(defaults::RECENT_ACTIVITY);

        Ok(DashboardView {
            dashboard: Dashboard::for_user(user, stats),
            recent,
        })
    }
}
