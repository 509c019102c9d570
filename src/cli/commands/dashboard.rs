//! Dashboard command handler

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::services::{DashboardService, DashboardView, Session};

use super::clip;
use crate::domain::Screen;

pub async fn cmd_dashboard(session: &Session) -> anyhow::Result<()> {
    if session.user().is_none() {
        println!("{} requires signing in.", Screen::Dashboard);
        println!("Sign in with: chemlab login <username>");
        return Ok(());
    }

    let view = DashboardService::new(session).load().await?;
    print!("{}", render_dashboard(&view, Utc::now()));
    Ok(())
}

pub(crate) fn render_dashboard(view: &DashboardView, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let dashboard = &view.dashboard;

    let _ = writeln!(out, "Dashboard");
    let _ = writeln!(out, "{:-<70}", "");
    for card in dashboard.cards() {
        let _ = writeln!(out, "  {:<20} {:>6}", card.label, card.value);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Quick actions");
    let _ = writeln!(out, "{:-<70}", "");
    for (label, screen) in dashboard.quick_actions() {
        let _ = writeln!(out, "  {label:<20} chemlab {}", screen.command());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", dashboard.activity_title());
    let _ = writeln!(out, "{:-<70}", "");
    if view.recent.is_empty() {
        let _ = writeln!(out, "  No borrow activity yet.");
    }
    for log in &view.recent {
        let status = log.display_status(now);
        let _ = writeln!(
            out,
            "  {} {:<24} {:>4} {:<8} {:<20} {}",
            status.marker(),
            clip(log.item_name().unwrap_or("?"), 24),
            log.quantity_borrowed,
            clip(log.unit(), 8),
            clip(log.borrower_name().unwrap_or("?"), 20),
            status
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dashboard;
    use crate::models::{DashboardStats, Role, User};

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            email: String::new(),
            full_name: "U".to_string(),
            student_id: None,
            role,
            is_active: true,
            created_at: None,
            profile_picture: None,
        }
    }

    #[test]
    fn test_viewer_dashboard_has_no_admin_cards() {
        let stats = DashboardStats {
            total_users: 40,
            ..DashboardStats::default()
        };
        let view = DashboardView {
            dashboard: Dashboard::for_user(&user(Role::Viewer), stats),
            recent: Vec::new(),
        };

        let text = render_dashboard(&view, Utc::now());
        assert!(text.contains("My Borrowed Items"));
        assert!(text.contains("My Recent Activity"));
        assert!(!text.contains("Total Users"));
        assert!(!text.contains("categories list"));
    }

    #[test]
    fn test_admin_dashboard_lists_admin_actions() {
        let view = DashboardView {
            dashboard: Dashboard::for_user(&user(Role::Admin), DashboardStats::default()),
            recent: Vec::new(),
        };

        let text = render_dashboard(&view, Utc::now());
        assert!(text.contains("Total Users"));
        assert!(text.contains("chemlab users list"));
        assert!(text.contains("No borrow activity yet."));
    }
}
