//! Item screen command handlers

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::fmt::Write;

use super::{clip, confirm, enter};
use crate::cli::ItemFields;
use crate::clients::ItemFilter;
use crate::config::Config;
use crate::constants::export::ITEMS_FILE;
use crate::domain::{BorrowForm, Screen};
use crate::export::CsvExporter;
use crate::models::Item;
use crate::services::{BorrowService, ItemService, Session, UserService};

pub async fn cmd_item_list(
    config: &Config,
    session: &Session,
    filter: ItemFilter,
    export: bool,
) -> anyhow::Result<()> {
    if !enter(session, Screen::Items).await? {
        return Ok(());
    }

    let items = ItemService::new(session).list(&filter).await?;

    if items.is_empty() {
        if filter.is_empty() {
            println!("No items in the inventory yet.");
        } else {
            println!("No items match the current filters.");
        }
        return Ok(());
    }

    print!("{}", render_items(&items, Utc::now()));

    if export {
        session.require_admin("Exporting items")?;
        let exporter = CsvExporter::from_config(&config.export);
        let path = exporter.write(ITEMS_FILE, &exporter.items(&items)).await?;
        println!();
        println!("✓ Exported {} items to {}", items.len(), path.display());
    }

    Ok(())
}

pub async fn cmd_item_show(config: &Config, session: &Session, id: i64) -> anyhow::Result<()> {
    if !enter(session, Screen::Items).await? {
        return Ok(());
    }

    let item = ItemService::new(session).get(id).await?;
    let now = Utc::now();

    println!("{} {}", item.stock_status(now).marker(), item.name);
    println!("{:-<70}", "");
    if let Some(description) = &item.description {
        println!("{description}");
        println!();
    }
    println!("ID:         {}", item.id);
    println!("Category:   {}", item.category_name().unwrap_or("-"));
    println!(
        "Available:  {} of {} {}",
        item.available_quantity, item.quantity, item.unit
    );
    println!("Min stock:  {}", item.min_stock_level);
    println!(
        "Location:   {}",
        item.storage_location.as_deref().unwrap_or("-")
    );
    println!("Condition:  {}", item.condition);
    if let Some(expiry) = item.expiry_date {
        let flag = if item.is_expired(now) { " (expired)" } else { "" };
        println!(
            "Expires:    {}{flag}",
            expiry.with_timezone(&Local).format("%Y-%m-%d")
        );
    }
    println!(
        "Borrowable: {}",
        if item.is_borrowable_now() { "yes" } else { "no" }
    );
    if let Some(image) = &item.image_url {
        println!("Image:      {}", config.api.upload_url(image));
    }
    if item.is_low_stock() {
        println!();
        println!("⚠ Stock is at or below the minimum level.");
    }

    Ok(())
}

pub async fn cmd_item_add(session: &Session, fields: ItemFields) -> anyhow::Result<()> {
    let item = ItemService::new(session)
        .create(&fields.into_new_draft())
        .await?;
    println!("✓ Added: {} (ID: {})", item.name, item.id);
    Ok(())
}

pub async fn cmd_item_edit(session: &Session, id: i64, fields: ItemFields) -> anyhow::Result<()> {
    let item = ItemService::new(session)
        .update(id, &fields.into_update_draft())
        .await?;
    println!("✓ Updated: {} (ID: {})", item.name, item.id);
    Ok(())
}

pub async fn cmd_item_delete(session: &Session, id: i64, yes: bool) -> anyhow::Result<()> {
    session.require_admin("Deleting items")?;
    let service = ItemService::new(session);
    let item = service.get(id).await?;

    if !confirm(
        &format!("Delete '{}' (ID: {}) from the inventory?", item.name, item.id),
        yes,
    )? {
        return Ok(());
    }

    service.delete(&item).await?;
    println!("✓ Deleted: {}", item.name);
    Ok(())
}

pub async fn cmd_item_borrow(session: &Session, form: BorrowForm) -> anyhow::Result<()> {
    session.require_admin("Recording borrows")?;

    if form.item_id.is_none() {
        return show_borrow_choices(session).await;
    }

    let today = Local::now().date_naive();
    let receipt = BorrowService::new(session).create(&form, today).await?;
    let item = &receipt.item_after;

    println!(
        "✓ Lent {} {} of {} to {}",
        receipt.log.quantity_borrowed,
        item.unit,
        item.name,
        receipt.log.borrower_name().unwrap_or("the borrower")
    );
    println!(
        "  Due back: {}",
        receipt
            .log
            .expected_return_date
            .with_timezone(&Local)
            .format("%Y-%m-%d")
    );
    println!(
        "  Remaining available: {} of {}",
        item.available_quantity, item.quantity
    );
    if item.is_low_stock() {
        println!("  ⚠ {} is now at or below its minimum stock level.", item.name);
    }

    Ok(())
}

async fn show_borrow_choices(session: &Session) -> anyhow::Result<()> {
    let item_service = ItemService::new(session);
    let user_service = UserService::new(session);
    let (items, borrowers) = tokio::try_join!(
        item_service.borrowable(),
        user_service.eligible_borrowers(),
    )?;

    println!("Borrowable items");
    println!("{:-<70}", "");
    if items.is_empty() {
        println!("  None available.");
    }
    for item in &items {
        println!(
            "  {:>4}  {:<32} {:>5} {} available",
            item.id,
            clip(&item.name, 32),
            item.available_quantity,
            item.unit
        );
    }

    println!();
    println!("Borrowers");
    println!("{:-<70}", "");
    if borrowers.is_empty() {
        println!("  No active viewer accounts.");
    }
    for user in &borrowers {
        println!("  {:>4}  {}", user.id, user.picker_label());
    }

    println!();
    println!(
        "Usage: chemlab items borrow <item_id> --user <user_id> --quantity <n> --due {}",
        example_due_date()
    );
    Ok(())
}

fn example_due_date() -> NaiveDate {
    Local::now().date_naive() + chrono::Days::new(7)
}

pub(crate) fn render_items(items: &[Item], now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Inventory Items ({} total)", items.len());
    let _ = writeln!(out, "{:-<70}", "");

    for item in items {
        let _ = writeln!(
            out,
            "{} {:>4}  {:<28} {:<14} {:>5}/{:<5} {:<8} {}",
            item.stock_status(now).marker(),
            item.id,
            clip(&item.name, 28),
            clip(item.category_name().unwrap_or("-"), 14),
            item.available_quantity,
            item.quantity,
            clip(&item.unit, 8),
            item.storage_location.as_deref().unwrap_or("-"),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Legend: ✓ OK | ▼ Low stock | ⚠ Expired");
    out
}
