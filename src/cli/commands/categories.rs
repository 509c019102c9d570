//! Category management command handlers

use super::{clip, confirm, enter};
use crate::domain::{Screen, validation};
use crate::models::CategoryDraft;
use crate::services::{CategoryService, Session};

pub async fn cmd_category_list(session: &Session) -> anyhow::Result<()> {
    if !enter(session, Screen::Categories).await? {
        return Ok(());
    }

    let categories = CategoryService::new(session).list().await?;

    if categories.is_empty() {
        println!("No categories yet.");
        println!();
        println!("Add one with: chemlab categories add \"Glassware\"");
        return Ok(());
    }

    println!("Categories ({} total)", categories.len());
    println!("{:-<70}", "");
    for category in &categories {
        println!(
            "{:>4}  {:<24} {:>4} items  {}",
            category.id,
            clip(&category.name, 24),
            category.items_count,
            category.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

pub async fn cmd_category_add(
    session: &Session,
    name: String,
    description: Option<String>,
) -> anyhow::Result<()> {
    let draft = CategoryDraft {
        name: Some(name),
        description,
    };
    let category = CategoryService::new(session).create(&draft).await?;
    println!("✓ Added category: {} (ID: {})", category.name, category.id);
    Ok(())
}

pub async fn cmd_category_edit(
    session: &Session,
    id: i64,
    name: Option<String>,
    description: Option<String>,
) -> anyhow::Result<()> {
    let draft = CategoryDraft { name, description };
    let category = CategoryService::new(session).update(id, &draft).await?;
    println!("✓ Updated category: {}", category.name);
    Ok(())
}

pub async fn cmd_category_delete(session: &Session, id: i64, yes: bool) -> anyhow::Result<()> {
    session.require_admin("Deleting categories")?;
    let service = CategoryService::new(session);
    let category = service.find(id).await?;

    validation::ensure_category_deletable(&category)?;

    if !confirm(
        &format!("Delete category '{}' (ID: {})?", category.name, category.id),
        yes,
    )? {
        return Ok(());
    }

    service.delete(&category).await?;
    println!("✓ Deleted category: {}", category.name);
    Ok(())
}
