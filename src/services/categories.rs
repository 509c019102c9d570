use tracing::warn;

use super::{ServiceError, ServiceResult, Session};
use crate::domain::validation;
use crate::models::{Category, CategoryDraft};

pub struct CategoryService<'a> {
    session: &'a Session,
}

impl<'a> CategoryService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Any signed-in user may read categories; item filters need them.
    pub async fn list(&self) -> ServiceResult<Vec<Category>> {
        self.session.require_user()?;
        Ok(self.session.api().list_categories().await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<Category> {
        self.list()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Category {id}")))
    }

    pub async fn create(&self, draft: &CategoryDraft) -> ServiceResult<Category> {
        self.session.require_admin("Adding categories")?;
        validation::validate_category_draft(draft, true)?;
        Ok(self.session.api().create_category(draft).await?)
    }

    pub async fn update(&self, id: i64, draft: &CategoryDraft) -> ServiceResult<Category> {
        self.session.require_admin("Editing categories")?;
        validation::validate_category_draft(draft, false)?;
        Ok(self.session.api().update_category(id, draft).await?)
    }

    /// Deletes a category that no item refers to.
    ///
    /// Takes the category as last fetched so a category still holding items
    /// is refused without a request.
    pub async fn delete(&self, category: &Category) -> ServiceResult<()> {
        self.session.require_admin("Deleting categories")?;
        if let Err(e) = validation::ensure_category_deletable(category) {
            warn!(id = category.id, items = category.items_count, "Refusing to delete category in use");
            return Err(e.into());
        }
        Ok(self.session.api().delete_category(category.id).await?)
    }
}
