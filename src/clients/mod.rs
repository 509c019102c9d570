pub mod api;
pub mod filters;
pub mod inventory;

pub use api::{ApiError, InventoryApi};
pub use filters::{BorrowLogFilter, ItemFilter, StatusFilter};
pub use inventory::InventoryClient;
