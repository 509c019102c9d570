//! Sign-in, sign-out and connectivity commands

use crate::clients::{InventoryApi, InventoryClient};
use crate::config::Config;
use crate::domain::navigation;
use crate::services::Session;

use super::prompt;

pub async fn cmd_login(
    session: &mut Session,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    let user = session.login(username, &password).await?;

    println!("✓ Signed in as {} ({})", user.full_name, user.role);
    println!();
    println!("Available screens:");
    for screen in navigation::navigation(user.role) {
        println!("  {:<16} chemlab {}", screen.title(), screen.command());
    }

    Ok(())
}

pub async fn cmd_logout(session: &mut Session) -> anyhow::Result<()> {
    session.logout().await?;
    println!("✓ Signed out.");
    println!("Sign in again with: chemlab login <username>");
    Ok(())
}

pub fn cmd_whoami(session: &Session) -> anyhow::Result<()> {
    let Some(user) = session.user() else {
        println!("Not signed in.");
        println!("Sign in with: chemlab login <username>");
        return Ok(());
    };

    println!("{}", user.full_name);
    println!("{:-<70}", "");
    println!("Username:   {}", user.username);
    println!("Email:      {}", user.email);
    if let Some(student_id) = &user.student_id {
        println!("Student ID: {student_id}");
    }
    println!("Role:       {}", user.role);
    println!(
        "Status:     {}",
        if user.is_active { "Active" } else { "Inactive" }
    );

    Ok(())
}

pub async fn cmd_health(config: &Config) -> anyhow::Result<()> {
    let client = InventoryClient::new(&config.api)?;

    println!("Checking {}...", client.base_url());
    let health = client.health().await?;

    println!(
        "✓ {} is {}",
        health.service.as_deref().unwrap_or("Server"),
        health.status
    );
    Ok(())
}
