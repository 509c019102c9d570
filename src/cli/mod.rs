//! CLI module - Command-line front-end for the lab inventory
//!
//! Each subcommand corresponds to one screen of the inventory system.

mod commands;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::clients::{BorrowLogFilter, ItemFilter, StatusFilter};
use crate::models::{Condition, ItemDraft, Role, UserUpdate};

/// chemlab - Chemistry laboratory inventory
/// Track items, borrows and returns against the lab inventory server
#[derive(Parser)]
#[command(name = "chemlab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true, env = "CHEMLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Access token to use instead of the saved session
    #[arg(long, global = true, env = "CHEMLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "CHEMLAB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Check that the server is reachable
    Health,

    /// Show the dashboard for your role
    #[command(alias = "home")]
    Dashboard,

    /// Browse and manage inventory items
    #[command(alias = "i")]
    Items {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Borrow history and returns
    #[command(alias = "b")]
    Borrowed {
        #[command(subcommand)]
        command: BorrowedCommands,
    },

    /// Manage item categories (admin)
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage user accounts (admin)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Low stock, expired and overdue reports
    Reports {
        /// Write a report to the export directory
        #[arg(long, value_enum)]
        export: Option<ReportKind>,
    },

    /// Create default config file
    Init,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// List items, optionally filtered
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: ItemFilterArgs,
        /// Also write the list to chem-lab-items.csv (admin)
        #[arg(long)]
        export: bool,
    },
    /// Show one item
    Show { id: i64 },
    /// Add an item (admin)
    Add {
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Edit an item (admin)
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Delete an item (admin)
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Lend an item to a viewer (admin). Without arguments, lists what can be borrowed.
    Borrow {
        /// Item ID
        id: Option<i64>,
        /// Borrower user ID
        #[arg(long)]
        user: Option<i64>,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Expected return date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Args, Default)]
pub struct ItemFilterArgs {
    /// Match name or description
    #[arg(long, short)]
    pub search: Option<String>,
    /// Category ID
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub location: Option<String>,
    /// good, for_disposal or expired
    #[arg(long)]
    pub condition: Option<Condition>,
    /// Only items at or below their minimum stock level
    #[arg(long)]
    pub low_stock: bool,
}

impl From<ItemFilterArgs> for ItemFilter {
    fn from(args: ItemFilterArgs) -> Self {
        Self {
            search: args.search,
            category_id: args.category,
            storage_location: args.location,
            condition: args.condition,
            low_stock: args.low_stock,
            borrowable_only: false,
        }
    }
}

#[derive(Args, Default)]
pub struct ItemFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Category ID
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub quantity: Option<i64>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub condition: Option<Condition>,
    #[arg(long)]
    pub min_stock: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub expiry_date: Option<NaiveDate>,
    #[arg(long)]
    pub borrowable: Option<bool>,
    /// png, jpg, jpeg or gif up to 5 MB
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl ItemFields {
    /// Draft for a new item; unset fields take the form defaults.
    #[must_use]
    pub fn into_new_draft(self) -> ItemDraft {
        let defaults = ItemDraft::new_item(String::new(), 0, 0);
        let mut draft = self.into_update_draft();
        draft.unit = draft.unit.or(defaults.unit);
        draft.condition = draft.condition.or(defaults.condition);
        draft.min_stock_level = draft.min_stock_level.or(defaults.min_stock_level);
        draft.is_borrowable = draft.is_borrowable.or(defaults.is_borrowable);
        draft
    }

    #[must_use]
    pub fn into_update_draft(self) -> ItemDraft {
        ItemDraft {
            name: self.name,
            description: self.description,
            category_id: self.category,
            quantity: self.quantity,
            unit: self.unit,
            storage_location: self.location,
            condition: self.condition,
            min_stock_level: self.min_stock,
            expiry_date: self.expiry_date,
            is_borrowable: self.borrowable,
            image: self.image,
        }
    }
}

#[derive(Subcommand)]
pub enum BorrowedCommands {
    /// List borrow records
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: BorrowFilterArgs,
        /// Also write the list to borrow-logs.csv
        #[arg(long)]
        export: bool,
    },
    /// Mark a borrow as returned (admin)
    Return {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct BorrowFilterArgs {
    /// borrowed, returned or overdue
    #[arg(long)]
    pub status: Option<StatusFilter>,
    /// Borrower user ID
    #[arg(long)]
    pub user: Option<i64>,
    /// Item ID
    #[arg(long)]
    pub item: Option<i64>,
    /// Only overdue borrows
    #[arg(long)]
    pub overdue: bool,
}

impl From<BorrowFilterArgs> for BorrowLogFilter {
    fn from(args: BorrowFilterArgs) -> Self {
        Self {
            status: args.status,
            user_id: args.user,
            item_id: args.item,
            overdue_only: args.overdue,
        }
    }
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories with item counts
    #[command(alias = "ls")]
    List,
    /// Add a category
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename or describe a category
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an empty category
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all accounts
    #[command(alias = "ls")]
    List,
    /// Create an account
    Add {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long, default_value = "viewer")]
        role: Role,
        /// Prompted for (twice) when omitted
        #[arg(long, env = "CHEMLAB_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Update an account; fields left out are unchanged
    Edit {
        id: i64,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Re-enable an account
    Activate { id: i64 },
    /// Disable an account without deleting it
    Deactivate {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct UserFields {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub role: Option<Role>,
    /// Leave empty to keep the current password
    #[arg(long)]
    pub password: Option<String>,
}

impl From<UserFields> for UserUpdate {
    fn from(fields: UserFields) -> Self {
        Self {
            username: fields.username,
            email: fields.email,
            full_name: fields.full_name,
            student_id: fields.student_id,
            role: fields.role,
            is_active: None,
            password: fields.password,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    LowStock,
    Expired,
    Overdue,
    All,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_borrow() {
        let cli = Cli::try_parse_from([
            "chemlab", "items", "borrow", "7", "--user", "3", "--quantity", "2", "--due",
            "2030-01-15",
        ])
        .unwrap();

        let Some(Commands::Items {
            command:
                ItemCommands::Borrow {
                    id,
                    user,
                    quantity,
                    due,
                    notes,
                },
        }) = cli.command
        else {
            panic!("expected items borrow");
        };

        assert_eq!(id, Some(7));
        assert_eq!(user, Some(3));
        assert_eq!(quantity, 2);
        assert_eq!(due, NaiveDate::from_ymd_opt(2030, 1, 15));
        assert!(notes.is_none());
    }

    #[test]
    fn test_cli_parses_status_filter() {
        let cli =
            Cli::try_parse_from(["chemlab", "borrowed", "list", "--status", "OVERDUE"]).unwrap();
        let Some(Commands::Borrowed {
            command: BorrowedCommands::List { filter, export },
        }) = cli.command
        else {
            panic!("expected borrowed list");
        };

        let filter = BorrowLogFilter::from(filter);
        assert_eq!(filter.status, Some(StatusFilter::Overdue));
        assert!(!export);
    }

    #[test]
    fn test_cli_rejects_unknown_condition() {
        assert!(
            Cli::try_parse_from(["chemlab", "items", "list", "--condition", "broken"]).is_err()
        );
    }

    #[test]
    fn test_new_item_draft_gets_defaults() {
        let fields = ItemFields {
            name: Some("Beaker".to_string()),
            category: Some(1),
            quantity: Some(10),
            ..ItemFields::default()
        };
        let draft = fields.into_new_draft();

        assert_eq!(draft.unit.as_deref(), Some("pieces"));
        assert_eq!(draft.condition, Some(Condition::Good));
        assert_eq!(draft.min_stock_level, Some(5));
        assert_eq!(draft.is_borrowable, Some(true));
    }

    #[test]
    fn test_update_draft_keeps_only_given_fields() {
        let fields = ItemFields {
            location: Some("Shelf B".to_string()),
            ..ItemFields::default()
        };
        let draft = fields.into_update_draft();
        assert_eq!(draft.form_fields(), vec![("storage_location", "Shelf B".to_string())]);
    }
}
