use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use super::{ItemService, ServiceError, ServiceResult, Session, UserService};
use crate::clients::BorrowLogFilter;
use crate::domain::validation::{self, BorrowForm};
use crate::models::{BorrowLog, Item, ReturnRequest};

/// Result of a successful borrow.
#[derive(Debug, Clone)]
pub struct BorrowReceipt {
    pub log: BorrowLog,
    /// The item as it should look now, projected locally from the item that
    /// was validated against.
    pub item_after: Item,
}

pub struct BorrowService<'a> {
    session: &'a Session,
}

impl<'a> BorrowService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Borrow logs visible to the current user.
    ///
    /// Filters are an admin feature. Viewers always get the server default,
    /// which is their own history.
    pub async fn list(&self, filter: &BorrowLogFilter) -> ServiceResult<Vec<BorrowLog>> {
        let user = self.session.require_user()?;

        let effective = if user.role.is_admin() || filter.is_empty() {
            filter.clone()
        } else {
            warn!(username = %user.username, "Ignoring borrow log filters for viewer account");
            BorrowLogFilter::default()
        };

        Ok(self.session.api().list_borrow_logs(&effective).await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<BorrowLog> {
        self.list(&BorrowLogFilter::default())
            .await?
            .into_iter()
            .find(|log| log.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Borrow record {id}")))
    }

    /// Validates and records a borrow.
    ///
    /// Checks that need no server data run before any request. Nothing is
    /// sent unless every remaining check passes against freshly loaded item
    /// and borrower records.
    pub async fn create(&self, form: &BorrowForm, today: NaiveDate) -> ServiceResult<BorrowReceipt> {
        let admin = self.session.require_admin("Recording borrows")?;
        let checked = validation::check_borrow_fields(form, today)?;

        let items = ItemService::new(self.session);
        let users = UserService::new(self.session);
        let (item, borrower) =
            tokio::try_join!(items.get(checked.item_id), users.find(checked.user_id))?;

        let payload = validation::validate_borrow(form, &item, &borrower, admin, today)?;
        let log = self.session.api().create_borrow_log(&payload).await?;

        info!(
            item = %item.name,
            borrower = %borrower.username,
            quantity = payload.quantity_borrowed,
            "Borrow recorded"
        );

        let item_after = item
            .after_borrow(payload.quantity_borrowed)
            .unwrap_or_else(|| item.clone());

        Ok(BorrowReceipt { log, item_after })
    }

    /// Marks an outstanding borrow as returned.
    pub async fn return_item(
        &self,
        log: &BorrowLog,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> ServiceResult<BorrowLog> {
        self.session.require_admin("Recording returns")?;

        if !log.display_status(now).is_active() {
            return Err(ServiceError::Blocked(format!(
                "Borrow record {} has already been returned",
                log.id
            )));
        }

        let request = ReturnRequest {
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        };
        Ok(self.session.api().return_borrow_log(log.id, &request).await?)
    }
}
