mod auth;
mod borrowed;
mod categories;
mod dashboard;
mod init;
mod items;
mod reports;
mod users;

pub use auth::{cmd_health, cmd_login, cmd_logout, cmd_whoami};
pub use borrowed::{cmd_borrowed_list, cmd_return};
pub use categories::{cmd_category_add, cmd_category_delete, cmd_category_edit, cmd_category_list};
pub use dashboard::cmd_dashboard;
pub use init::cmd_init;
pub use items::{
    cmd_item_add, cmd_item_borrow, cmd_item_delete, cmd_item_edit, cmd_item_list, cmd_item_show,
};
pub use reports::cmd_reports;
pub use users::{NewUserArgs, cmd_user_add, cmd_user_edit, cmd_user_list, cmd_user_set_active};

use std::io::Write;
use std::sync::Arc;

use crate::clients::InventoryClient;
use crate::config::Config;
use crate::domain::{Access, Screen};
use crate::services::{Session, TokenStore};

/// Opens the API client and restores the saved session, if any.
pub async fn open_session(config: &Config, token: Option<String>) -> anyhow::Result<Session> {
    let client = InventoryClient::new(&config.api)?;
    let store = TokenStore::new(config.token_path());
    Ok(Session::restore(Arc::new(client), store, token).await?)
}

/// A session that skips validating the stored token.
pub fn offline_session(config: &Config) -> anyhow::Result<Session> {
    let client = InventoryClient::new(&config.api)?;
    Ok(Session::new(
        Arc::new(client),
        TokenStore::new(config.token_path()),
    ))
}

/// Applies role gating before a screen is shown.
///
/// Returns `false` when the caller was sent elsewhere; a viewer asking for an
/// admin screen gets the dashboard instead.
pub(crate) async fn enter(session: &Session, screen: Screen) -> anyhow::Result<bool> {
    match session.access(screen) {
        Access::Granted(_) => Ok(true),
        Access::Redirect {
            requested,
            to: Screen::Login,
        } => {
            println!("{requested} requires signing in.");
            println!("Sign in with: chemlab login <username>");
            Ok(false)
        }
        Access::Redirect { requested, to } => {
            println!("{requested} is only available to admins. Showing {to} instead.");
            println!();
            if to == Screen::Dashboard {
                cmd_dashboard(session).await?;
            }
            Ok(false)
        }
    }
}

pub(crate) fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) fn confirm(question: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    println!("{question}");
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        Ok(true)
    } else {
        println!("Cancelled.");
        Ok(false)
    }
}

/// Shortens `text` to `width` characters for table columns.
pub(crate) fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("Beaker", 10), "Beaker");
        assert_eq!(clip("Erlenmeyer flask", 8), "Erlenme…");
        assert_eq!(clip("", 4), "");
    }
}
