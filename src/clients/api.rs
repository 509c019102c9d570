use async_trait::async_trait;
use thiserror::Error;

use super::filters::{BorrowLogFilter, ItemFilter};
use crate::models::{
    BorrowLog, Category, CategoryDraft, DashboardStats, HealthStatus, Item, ItemDraft,
    LoginResponse, NewBorrowLog, NewUser, ReturnRequest, User, UserUpdate,
};

/// Errors from talking to the inventory API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cannot reach server: {0}")]
    Transport(String),

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Request(format!("invalid URL: {err}"))
    }
}

impl ApiError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// The REST resources this client consumes.
///
/// Implementations hold the session token; [`InventoryApi::set_token`] swaps
/// it after login or logout.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    fn set_token(&self, token: Option<String>);

    async fn health(&self) -> Result<HealthStatus, ApiError>;

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;

    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, ApiError>;

    async fn get_item(&self, id: i64) -> Result<Item, ApiError>;

    async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError>;

    async fn update_item(&self, id: i64, draft: &ItemDraft) -> Result<Item, ApiError>;

    async fn delete_item(&self, id: i64) -> Result<(), ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError>;

    async fn update_category(&self, id: i64, draft: &CategoryDraft)
    -> Result<Category, ApiError>;

    async fn delete_category(&self, id: i64) -> Result<(), ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError>;

    async fn list_borrow_logs(&self, filter: &BorrowLogFilter)
    -> Result<Vec<BorrowLog>, ApiError>;

    async fn create_borrow_log(&self, log: &NewBorrowLog) -> Result<BorrowLog, ApiError>;

    async fn return_borrow_log(
        &self,
        id: i64,
        request: &ReturnRequest,
    ) -> Result<BorrowLog, ApiError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}
