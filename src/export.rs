//! CSV files for the items list, the borrow log and the reports screen.
//!
//! Each export has a fixed header and file name. Dates use the configured
//! format in local time; missing values become a placeholder.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::ExportConfig;
use crate::constants::export::PLACEHOLDER;
use crate::models::{BorrowLog, Item};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    directory: PathBuf,
    date_format: String,
}

impl CsvExporter {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, date_format: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            date_format: date_format.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.directory, &config.date_format)
    }

    #[must_use]
    pub fn items(&self, items: &[Item]) -> String {
        let mut csv = header(&[
            "Name",
            "Category",
            "Quantity",
            "Available",
            "Unit",
            "Location",
            "Condition",
        ]);
        for item in items {
            push_row(&mut csv, &item_columns(item));
        }
        csv
    }

    /// Borrow log export; the status column is derived at `now`.
    #[must_use]
    pub fn borrow_logs(&self, logs: &[BorrowLog], now: DateTime<Utc>) -> String {
        let mut csv = header(&[
            "Item",
            "User",
            "Quantity",
            "Borrow Date",
            "Expected Return",
            "Actual Return",
            "Status",
        ]);
        for log in logs {
            push_row(
                &mut csv,
                &[
                    text(log.item_name()),
                    text(log.borrower_name()),
                    log.quantity_borrowed.to_string(),
                    self.date(Some(log.borrow_date)),
                    self.date(Some(log.expected_return_date)),
                    self.date(log.actual_return_date),
                    log.display_status(now).to_string(),
                ],
            );
        }
        csv
    }

    #[must_use]
    pub fn low_stock(&self, items: &[Item]) -> String {
        let mut csv = header(&[
            "Name",
            "Category",
            "Quantity",
            "Available",
            "Unit",
            "Location",
            "Condition",
            "Status",
        ]);
        for item in items {
            let mut row = item_columns(item);
            row.push(if item.is_low_stock() { "LOW STOCK" } else { "OK" }.to_string());
            push_row(&mut csv, &row);
        }
        csv
    }

    #[must_use]
    pub fn expired(&self, items: &[Item]) -> String {
        let mut csv = header(&["Name", "Category", "Quantity", "Unit", "Location", "Expiry Date"]);
        for item in items {
            push_row(
                &mut csv,
                &[
                    item.name.clone(),
                    text(item.category_name()),
                    item.quantity.to_string(),
                    item.unit.clone(),
                    text(item.storage_location.as_deref()),
                    self.date(item.expiry_date),
                ],
            );
        }
        csv
    }

    #[must_use]
    pub fn overdue(&self, logs: &[BorrowLog], now: DateTime<Utc>) -> String {
        let mut csv = header(&[
            "Item",
            "User",
            "Quantity",
            "Borrow Date",
            "Expected Return",
            "Status",
        ]);
        for log in logs {
            push_row(
                &mut csv,
                &[
                    text(log.item_name()),
                    text(log.borrower_name()),
                    log.quantity_borrowed.to_string(),
                    self.date(Some(log.borrow_date)),
                    self.date(Some(log.expected_return_date)),
                    log.display_status(now).to_string(),
                ],
            );
        }
        csv
    }

    /// Writes `content` under the export directory and returns the path.
    pub async fn write(&self, file_name: &str, content: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(file_name);
        tokio::fs::write(&path, content).await?;
        info!(path = %path.display(), bytes = content.len(), "Exported CSV");
        Ok(path)
    }

    fn date(&self, value: Option<DateTime<Utc>>) -> String {
        let Some(value) = value else {
            return PLACEHOLDER.to_string();
        };
        let local = value.with_timezone(&Local);

        let mut out = String::new();
        if write!(out, "{}", local.format(&self.date_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", local.format(FALLBACK_DATE_FORMAT));
        }
        out
    }
}

fn item_columns(item: &Item) -> Vec<String> {
    vec![
        item.name.clone(),
        text(item.category_name()),
        item.quantity.to_string(),
        item.available_quantity.to_string(),
        item.unit.clone(),
        text(item.storage_location.as_deref()),
        item.condition.as_str().to_string(),
    ]
}

fn text(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

fn header(columns: &[&str]) -> String {
    let mut csv = String::new();
    let _ = writeln!(csv, "{}", columns.join(","));
    csv
}

fn push_row(csv: &mut String, fields: &[String]) {
    let row: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    let _ = writeln!(csv, "{}", row.join(","));
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BorrowedItemRef, BorrowerRef, Category, Condition, StoredStatus};
    use chrono::{Duration, TimeZone};

    fn exporter() -> CsvExporter {
        CsvExporter::new(".", "%Y-%m-%d")
    }

    fn item(name: &str, available: i64, min_stock: i64) -> Item {
        Item {
            id: 1,
            name: name.to_string(),
            description: None,
            category_id: Some(1),
            category: Some(Category {
                id: 1,
                name: "Glassware".to_string(),
                description: None,
                items_count: 1,
            }),
            quantity: 10,
            available_quantity: available,
            unit: "pieces".to_string(),
            storage_location: None,
            condition: Condition::Good,
            min_stock_level: min_stock,
            expiry_date: None,
            is_borrowable: true,
            image_url: None,
        }
    }

    fn log(id: i64, status: StoredStatus, due: DateTime<Utc>) -> BorrowLog {
        BorrowLog {
            id,
            item_id: 1,
            user_id: 2,
            admin_id: Some(1),
            quantity_borrowed: 2,
            borrow_date: due - Duration::days(7),
            expected_return_date: due,
            actual_return_date: None,
            status,
            notes: None,
            item: Some(BorrowedItemRef {
                id: 1,
                name: "Beaker".to_string(),
                unit: Some("pieces".to_string()),
                category: None,
            }),
            user: Some(BorrowerRef {
                id: 2,
                username: "jdoe".to_string(),
                full_name: "Jane Doe".to_string(),
                student_id: None,
            }),
        }
    }

    #[test]
    fn test_escape_only_when_needed() {
        assert_eq!(escape("Beaker"), "Beaker");
        assert_eq!(escape("Flask, 250ml"), "\"Flask, 250ml\"");
        assert_eq!(escape("3\" tube"), "\"3\"\" tube\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_items_export_has_one_row_per_item() {
        let items = vec![item("Beaker", 10, 5), item("Flask, 250ml", 2, 5)];
        let csv = exporter().items(&items);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), items.len() + 1);
        assert_eq!(lines[0], "Name,Category,Quantity,Available,Unit,Location,Condition");
        assert_eq!(lines[1], "Beaker,Glassware,10,10,pieces,N/A,good");
        assert!(lines[2].starts_with("\"Flask, 250ml\","));
    }

    #[test]
    fn test_low_stock_status_column() {
        let csv = exporter().low_stock(&[item("Beaker", 4, 5), item("Flask", 9, 5)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].ends_with(",LOW STOCK"));
        assert!(lines[2].ends_with(",OK"));
    }

    #[test]
    fn test_borrow_log_status_is_derived() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let logs = vec![
            log(1, StoredStatus::Borrowed, now - Duration::days(1)),
            log(2, StoredStatus::Overdue, now + Duration::days(3)),
            log(3, StoredStatus::Returned, now - Duration::days(9)),
        ];

        let csv = exporter().borrow_logs(&logs, now);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].ends_with(",N/A,OVERDUE"));
        assert!(lines[2].ends_with(",BORROWED"));
        assert!(lines[3].ends_with(",RETURNED"));
    }

    #[test]
    fn test_overdue_report_rows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let logs = vec![log(1, StoredStatus::Borrowed, now - Duration::days(2))];
        let csv = exporter().overdue(&logs, now);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Beaker,Jane Doe,2,"));
        assert!(lines[1].ends_with(",OVERDUE"));
    }

    #[test]
    fn test_expired_report_placeholder_for_missing_date() {
        let csv = exporter().expired(&[item("Ether", 1, 1)]);
        assert!(csv.lines().nth(1).unwrap().ends_with(",N/A"));
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let exporter = CsvExporter::new(".", "%Q");
        let date = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert!(!exporter.date(Some(date)).is_empty());
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = std::env::temp_dir().join(format!("chemlab-export-{}", uuid::Uuid::new_v4()));
        let exporter = CsvExporter::new(&dir, "%Y-%m-%d");

        let path = exporter.write("items.csv", "Name\n").await.unwrap();
        assert_eq!(path, dir.join("items.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Name\n");

        std::fs::remove_dir_all(&dir).ok();
    }
}
