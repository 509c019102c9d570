//! Display status of a borrow.
//!
//! Overdue is never stored by this client: it is derived from the stored
//! status and the expected return date every time a borrow is shown,
//! filtered or exported.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::models::{BorrowLog, StoredStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Borrowed,
    Overdue,
    Returned,
}

impl DisplayStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Borrowed => "BORROWED",
            Self::Overdue => "OVERDUE",
            Self::Returned => "RETURNED",
        }
    }

    /// Single-character marker used in terminal tables.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Borrowed => "◷",
            Self::Overdue => "⚠",
            Self::Returned => "✓",
        }
    }

    /// Whether the borrow is still out and can be marked returned.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Returned)
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the display status from what the server stored.
///
/// A returned borrow is always `Returned`. Anything else is `Overdue` once
/// the expected return date has passed and `Borrowed` before that, whatever
/// literal the server used.
#[must_use]
pub fn display_status(
    stored: StoredStatus,
    expected_return_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DisplayStatus {
    match stored {
        StoredStatus::Returned => DisplayStatus::Returned,
        StoredStatus::Borrowed | StoredStatus::Overdue if expected_return_date < now => {
            DisplayStatus::Overdue
        }
        StoredStatus::Borrowed | StoredStatus::Overdue => DisplayStatus::Borrowed,
    }
}

impl BorrowLog {
    #[must_use]
    pub fn display_status(&self, now: DateTime<Utc>) -> DisplayStatus {
        display_status(self.status, self.expected_return_date, now)
    }
}
