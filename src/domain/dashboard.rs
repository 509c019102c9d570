//! Role-specific dashboards.
//!
//! The variant is picked once from the user's role; each variant owns its
//! cards and quick actions so the two presentations never share conditionals.

use crate::models::{DashboardStats, User};

use super::navigation::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub enum Dashboard {
    Admin(DashboardStats),
    Viewer(DashboardStats),
}

impl Dashboard {
    #[must_use]
    pub fn for_user(user: &User, stats: DashboardStats) -> Self {
        if user.role.is_admin() {
            Self::Admin(stats)
        } else {
            Self::Viewer(stats)
        }
    }

    #[must_use]
    pub fn cards(&self) -> Vec<StatCard> {
        let card = |label, value| StatCard { label, value };
        match self {
            Self::Admin(s) => vec![
                card("Total Items", s.total_items),
                card("Categories", s.total_categories),
                card("Low Stock", s.low_stock_items),
                card("Expired Items", s.expired_items),
                card("Borrowed Items", s.total_borrowed_items),
                card("Overdue Returns", s.overdue_borrows),
                card("Total Users", s.total_users),
            ],
            Self::Viewer(s) => vec![
                card("Total Items", s.total_items),
                card("Categories", s.total_categories),
                card("My Borrowed Items", s.total_borrowed_items),
                card("My Overdue Items", s.overdue_borrows),
            ],
        }
    }

    #[must_use]
    pub fn quick_actions(&self) -> Vec<(&'static str, Screen)> {
        match self {
            Self::Admin(_) => vec![
                ("View Items", Screen::Items),
                ("Manage Categories", Screen::Categories),
                ("User Management", Screen::Users),
                ("Borrowed Items", Screen::Borrowed),
                ("View Reports", Screen::Reports),
            ],
            Self::Viewer(_) => vec![
                ("View Items", Screen::Items),
                ("My Borrowed Items", Screen::Borrowed),
            ],
        }
    }

    #[must_use]
    pub const fn activity_title(&self) -> &'static str {
        match self {
            Self::Admin(_) => "Recent Activity",
            Self::Viewer(_) => "My Recent Activity",
        }
    }
}
