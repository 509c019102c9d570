//! User management command handlers

use chrono::Local;

use super::{clip, confirm, enter, prompt};
use crate::domain::Screen;
use crate::models::{NewUser, Role, UserUpdate};
use crate::services::{Session, UserService};

pub async fn cmd_user_list(session: &Session) -> anyhow::Result<()> {
    if !enter(session, Screen::Users).await? {
        return Ok(());
    }

    let users = UserService::new(session).list().await?;

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");
    for user in &users {
        let status = if user.is_active { "●" } else { "○" };
        let joined = user
            .created_at
            .map(|d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{status} {:>4}  {:<16} {:<24} {:<7} {:<12} {}",
            user.id,
            clip(&user.username, 16),
            clip(&user.full_name, 24),
            user.role,
            user.student_id.as_deref().unwrap_or("-"),
            joined
        );
    }

    println!();
    println!("Legend: ● Active | ○ Inactive");
    Ok(())
}

pub struct NewUserArgs {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub student_id: Option<String>,
    pub role: Role,
    pub password: Option<String>,
}

pub async fn cmd_user_add(session: &Session, args: NewUserArgs) -> anyhow::Result<()> {
    session.require_admin("Adding users")?;

    let (password, confirm_password) = match args.password {
        Some(password) => (password.clone(), password),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };

    let new_user = NewUser {
        username: args.username,
        email: args.email,
        full_name: args.full_name,
        student_id: args.student_id.filter(|s| !s.trim().is_empty()),
        role: args.role,
        password,
    };

    let user = UserService::new(session)
        .create(&new_user, &confirm_password)
        .await?;
    println!(
        "✓ Created {} account: {} (ID: {})",
        user.role, user.username, user.id
    );
    Ok(())
}

pub async fn cmd_user_edit(session: &Session, id: i64, update: UserUpdate) -> anyhow::Result<()> {
    let user = UserService::new(session).update(id, update).await?;
    println!("✓ Updated: {} ({})", user.username, user.full_name);
    Ok(())
}

pub async fn cmd_user_set_active(
    session: &Session,
    id: i64,
    active: bool,
    yes: bool,
) -> anyhow::Result<()> {
    session.require_admin("Activating or deactivating users")?;
    let service = UserService::new(session);
    let user = service.find(id).await?;

    if user.is_active == active {
        println!(
            "{} is already {}.",
            user.username,
            if active { "active" } else { "inactive" }
        );
        return Ok(());
    }

    let verb = if active { "Activate" } else { "Deactivate" };
    if !confirm(
        &format!("{verb} account '{}' ({})?", user.username, user.full_name),
        yes || active,
    )? {
        return Ok(());
    }

    let updated = service.set_active(&user, active).await?;
    println!(
        "✓ {} is now {}",
        updated.username,
        if updated.is_active { "active" } else { "inactive" }
    );
    Ok(())
}
