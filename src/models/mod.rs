pub mod borrow;
pub mod category;
pub mod item;
pub mod stats;
pub mod timestamp;
pub mod user;

pub use borrow::{BorrowLog, BorrowedItemRef, BorrowerRef, NewBorrowLog, ReturnRequest, StoredStatus};
pub use category::{Category, CategoryDraft};
pub use item::{Condition, Item, ItemDraft};
pub use stats::{DashboardStats, HealthStatus};
pub use user::{LoginResponse, NewUser, Role, User, UserUpdate};
