//! Screen routing and role gating.

use std::fmt;

use crate::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Dashboard,
    Items,
    Borrowed,
    Categories,
    Users,
    Reports,
}

const BASE_NAVIGATION: &[Screen] = &[Screen::Dashboard, Screen::Items, Screen::Borrowed];

const ADMIN_NAVIGATION: &[Screen] = &[Screen::Categories, Screen::Users, Screen::Reports];

impl Screen {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Items => "Items",
            Self::Borrowed => "Borrowed Items",
            Self::Categories => "Categories",
            Self::Users => "Users",
            Self::Reports => "Reports",
        }
    }

    /// CLI subcommand that opens the screen.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Items => "items list",
            Self::Borrowed => "borrowed list",
            Self::Categories => "categories list",
            Self::Users => "users list",
            Self::Reports => "reports",
        }
    }

    #[must_use]
    pub const fn admin_only(&self) -> bool {
        matches!(self, Self::Categories | Self::Users)
    }

    #[must_use]
    pub const fn requires_login(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Outcome of asking for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted(Screen),
    /// The caller lacks the role; show `to` instead.
    Redirect { requested: Screen, to: Screen },
}

impl Access {
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            Self::Granted(screen) | Self::Redirect { to: screen, .. } => *screen,
        }
    }
}

/// Resolves which screen to show for the current user.
///
/// Signed-out users always land on the login screen. Viewers asking for an
/// admin screen land on the dashboard.
#[must_use]
pub fn resolve(user: Option<&User>, requested: Screen) -> Access {
    let Some(user) = user else {
        return if requested.requires_login() {
            Access::Redirect {
                requested,
                to: Screen::Login,
            }
        } else {
            Access::Granted(requested)
        };
    };

    if requested == Screen::Login {
        return Access::Redirect {
            requested,
            to: Screen::Dashboard,
        };
    }

    if requested.admin_only() && !user.role.is_admin() {
        return Access::Redirect {
            requested,
            to: Screen::Dashboard,
        };
    }

    Access::Granted(requested)
}

/// Navigation entries visible to a role.
#[must_use]
pub fn navigation(role: Role) -> Vec<Screen> {
    let mut screens = BASE_NAVIGATION.to_vec();
    if role.is_admin() {
        screens.extend_from_slice(ADMIN_NAVIGATION);
    }
    screens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            email: "u@lab.test".to_string(),
            full_name: "U".to_string(),
            student_id: None,
            role,
            is_active: true,
            created_at: None,
            profile_picture: None,
        }
    }

    #[test]
    fn test_signed_out_goes_to_login() {
        assert_eq!(
            resolve(None, Screen::Items),
            Access::Redirect {
                requested: Screen::Items,
                to: Screen::Login
            }
        );
        assert_eq!(resolve(None, Screen::Login), Access::Granted(Screen::Login));
    }

    #[test]
    fn test_viewer_redirected_from_admin_screens() {
        let viewer = user(Role::Viewer);
        for screen in [Screen::Categories, Screen::Users] {
            assert_eq!(resolve(Some(&viewer), screen).screen(), Screen::Dashboard);
        }
        assert_eq!(
            resolve(Some(&viewer), Screen::Borrowed),
            Access::Granted(Screen::Borrowed)
        );
        assert_eq!(
            resolve(Some(&viewer), Screen::Reports),
            Access::Granted(Screen::Reports)
        );
    }

    #[test]
    fn test_admin_reaches_everything() {
        let admin = user(Role::Admin);
        for screen in [
            Screen::Dashboard,
            Screen::Items,
            Screen::Borrowed,
            Screen::Categories,
            Screen::Users,
            Screen::Reports,
        ] {
            assert_eq!(resolve(Some(&admin), screen), Access::Granted(screen));
        }
    }

    #[test]
    fn test_navigation_by_role() {
        assert_eq!(navigation(Role::Viewer).len(), 3);
        let admin = navigation(Role::Admin);
        assert_eq!(admin.len(), 6);
        assert!(admin.contains(&Screen::Users));
    }
}
