//! Pure inventory rules shared by every screen.
//!
//! Nothing in here performs I/O: callers pass in the data they fetched and
//! the current time.

pub mod dashboard;
pub mod navigation;
pub mod status;
pub mod stock;
pub mod validation;

pub use dashboard::{Dashboard, StatCard};
pub use navigation::{Access, Screen};
pub use status::{DisplayStatus, display_status};
pub use stock::StockStatus;
pub use validation::{BorrowForm, ValidationError};
