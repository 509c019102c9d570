//! Screen-level operations on top of [`InventoryApi`](crate::clients::InventoryApi).
//!
//! Services run the client-side checks, enforce role gating and only then
//! talk to the server.

use std::path::PathBuf;
use thiserror::Error;

use crate::clients::ApiError;
use crate::domain::ValidationError;

pub mod borrow;
pub mod categories;
pub mod dashboard;
pub mod items;
pub mod reports;
pub mod session;
pub mod users;

pub use borrow::{BorrowReceipt, BorrowService};
pub use categories::CategoryService;
pub use dashboard::{DashboardService, DashboardView};
pub use items::ItemService;
pub use reports::{Report, ReportService};
pub use session::{Session, TokenStore};
pub use users::UserService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Please sign in first")]
    NotSignedIn,

    #[error("{0}")]
    Blocked(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub(crate) fn admin_only(action: &str) -> Self {
        Self::Blocked(format!("{action} requires an admin account"))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
