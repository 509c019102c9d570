//! Borrowed items command handlers

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

use super::{clip, confirm, enter};
use crate::clients::BorrowLogFilter;
use crate::config::Config;
use crate::constants::export::BORROW_LOGS_FILE;
use crate::domain::{DisplayStatus, Screen};
use crate::export::CsvExporter;
use crate::models::BorrowLog;
use crate::services::{BorrowService, Session};

pub async fn cmd_borrowed_list(
    config: &Config,
    session: &Session,
    filter: BorrowLogFilter,
    export: bool,
) -> anyhow::Result<()> {
    if !enter(session, Screen::Borrowed).await? {
        return Ok(());
    }

    let logs = BorrowService::new(session).list(&filter).await?;
    let now = Utc::now();
    let title = if session.is_admin() {
        "Borrowed Items"
    } else {
        "My Borrowed Items"
    };

    if logs.is_empty() {
        println!("No borrow records found.");
        return Ok(());
    }

    print!("{}", render_logs(title, &logs, now));

    if export {
        let exporter = CsvExporter::from_config(&config.export);
        let path = exporter
            .write(BORROW_LOGS_FILE, &exporter.borrow_logs(&logs, now))
            .await?;
        println!();
        println!("✓ Exported {} records to {}", logs.len(), path.display());
    }

    Ok(())
}

pub async fn cmd_return(
    session: &Session,
    id: i64,
    notes: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    session.require_admin("Recording returns")?;
    let service = BorrowService::new(session);
    let log = service.find(id).await?;
    let now = Utc::now();

    if log.display_status(now) == DisplayStatus::Returned {
        println!("Borrow record {id} has already been returned.");
        return Ok(());
    }

    if !confirm(
        &format!(
            "Mark {} {} of {} borrowed by {} as returned?",
            log.quantity_borrowed,
            log.unit(),
            log.item_name().unwrap_or("this item"),
            log.borrower_name().unwrap_or("this user"),
        ),
        yes,
    )? {
        return Ok(());
    }

    let returned = service.return_item(&log, notes, now).await?;
    println!(
        "✓ Returned: {} ({})",
        returned.item_name().or(log.item_name()).unwrap_or("item"),
        returned.display_status(now)
    );
    Ok(())
}

pub(crate) fn render_logs(title: &str, logs: &[BorrowLog], now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{title} ({} records)", logs.len());
    let _ = writeln!(out, "{:-<70}", "");

    for log in logs {
        let status = log.display_status(now);
        let _ = writeln!(
            out,
            "{} {:>4}  {:<24} {:>4} {:<8} {:<20} due {}  {}",
            status.marker(),
            log.id,
            clip(log.item_name().unwrap_or("?"), 24),
            log.quantity_borrowed,
            clip(log.unit(), 8),
            clip(log.borrower_name().unwrap_or("?"), 20),
            log.expected_return_date.with_timezone(&Local).format("%Y-%m-%d"),
            status
        );
        if let Some(notes) = log.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = writeln!(out, "        Notes: {notes}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Legend: ◷ Borrowed | ⚠ Overdue | ✓ Returned");
    out
}
