//! Reports command handler

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

use super::{clip, enter};
use crate::cli::ReportKind;
use crate::config::Config;
use crate::constants::export::{EXPIRED_FILE, LOW_STOCK_FILE, OVERDUE_FILE};
use crate::domain::Screen;
use crate::export::CsvExporter;
use crate::services::{Report, ReportService, Session};

pub async fn cmd_reports(
    config: &Config,
    session: &Session,
    export: Option<ReportKind>,
) -> anyhow::Result<()> {
    if !enter(session, Screen::Reports).await? {
        return Ok(());
    }

    let now = Utc::now();
    let report = ReportService::new(session).load(now).await?;
    print!("{}", render_report(&report, now));

    let Some(kind) = export else {
        return Ok(());
    };

    let exporter = CsvExporter::from_config(&config.export);
    println!();

    if matches!(kind, ReportKind::LowStock | ReportKind::All) {
        let path = exporter
            .write(LOW_STOCK_FILE, &exporter.low_stock(&report.low_stock))
            .await?;
        println!("✓ Low stock report: {}", path.display());
    }

    if matches!(kind, ReportKind::Expired | ReportKind::All) {
        let path = exporter
            .write(EXPIRED_FILE, &exporter.expired(&report.expired))
            .await?;
        println!("✓ Expired items report: {}", path.display());
    }

    if matches!(kind, ReportKind::Overdue | ReportKind::All) {
        match &report.overdue {
            Some(overdue) => {
                let path = exporter
                    .write(OVERDUE_FILE, &exporter.overdue(overdue, now))
                    .await?;
                println!("✓ Overdue borrows report: {}", path.display());
            }
            None => println!("The overdue report is only available to admins."),
        }
    }

    Ok(())
}

pub(crate) fn render_report(report: &Report, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    let _ = writeln!(out, "Reports & Analytics");
    let _ = writeln!(out, "{:-<70}", "");
    let _ = writeln!(
        out,
        "  Items {}  |  Low stock {}  |  Expired {}  |  Borrowed {}  |  Overdue {}",
        stats.total_items,
        stats.low_stock_items,
        stats.expired_items,
        stats.total_borrowed_items,
        stats.overdue_borrows
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Low Stock Items ({})", report.low_stock.len());
    let _ = writeln!(out, "{:-<70}", "");
    if report.low_stock.is_empty() {
        let _ = writeln!(out, "  All items are sufficiently stocked.");
    }
    for item in &report.low_stock {
        let _ = writeln!(
            out,
            "  {:<32} {:>5} / min {:<5} {}",
            clip(&item.name, 32),
            item.available_quantity,
            item.min_stock_level,
            item.unit
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Expired Items ({})", report.expired.len());
    let _ = writeln!(out, "{:-<70}", "");
    if report.expired.is_empty() {
        let _ = writeln!(out, "  No expired items.");
    }
    for item in &report.expired {
        let expiry = item.expiry_date.map_or_else(
            || item.condition.to_string(),
            |d| d.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        );
        let _ = writeln!(out, "  {:<32} {expiry}", clip(&item.name, 32));
    }

    if let Some(overdue) = &report.overdue {
        let _ = writeln!(out);
        let _ = writeln!(out, "Overdue Borrows ({})", overdue.len());
        let _ = writeln!(out, "{:-<70}", "");
        if overdue.is_empty() {
            let _ = writeln!(out, "  Nothing is overdue.");
        }
        for log in overdue {
            let days = (now - log.expected_return_date).num_days();
            let _ = writeln!(
                out,
                "  {} {:<24} {:<20} {} day(s) late",
                log.display_status(now).marker(),
                clip(log.item_name().unwrap_or("?"), 24),
                clip(log.borrower_name().unwrap_or("?"), 20),
                days.max(0)
            );
        }
    }

    out
}
