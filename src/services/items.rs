use std::path::Path;

use super::{ServiceError, ServiceResult, Session};
use crate::clients::ItemFilter;
use crate::domain::validation;
use crate::models::{Item, ItemDraft};

pub struct ItemService<'a> {
    session: &'a Session,
}

impl<'a> ItemService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self, filter: &ItemFilter) -> ServiceResult<Vec<Item>> {
        self.session.require_user()?;
        Ok(self.session.api().list_items(filter).await?)
    }

    /// Items offered in the borrow form.
    pub async fn borrowable(&self) -> ServiceResult<Vec<Item>> {
        self.list(&ItemFilter::borrowable()).await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Item> {
        self.session.require_user()?;
        Ok(self.session.api().get_item(id).await?)
    }

    pub async fn create(&self, draft: &ItemDraft) -> ServiceResult<Item> {
        self.session.require_admin("Adding items")?;
        validation::validate_item_draft(draft, true)?;
        if let Some(path) = &draft.image {
            check_image(path).await?;
        }
        Ok(self.session.api().create_item(draft).await?)
    }

    pub async fn update(&self, id: i64, draft: &ItemDraft) -> ServiceResult<Item> {
        self.session.require_admin("Editing items")?;
        validation::validate_item_draft(draft, false)?;
        if let Some(path) = &draft.image {
            check_image(path).await?;
        }
        Ok(self.session.api().update_item(id, draft).await?)
    }

    pub async fn delete(&self, item: &Item) -> ServiceResult<()> {
        self.session.require_admin("Deleting items")?;
        Ok(self.session.api().delete_item(item.id).await?)
    }
}

async fn check_image(path: &Path) -> ServiceResult<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    validation::validate_image(path, metadata.len())?;
    Ok(())
}
