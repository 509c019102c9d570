//! Signed-in state shared by every command.
//!
//! The token lives in a small file so separate invocations reuse one login.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ServiceError, ServiceResult};
use crate::clients::InventoryApi;
use crate::domain::navigation::{self, Access, Screen};
use crate::domain::ValidationError;
use crate::models::User;

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> ServiceResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    pub async fn save(&self, token: &str) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        tokio::fs::write(&self.path, token)
            .await
            .map_err(|source| self.io_error(source))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        debug!(path = %self.path.display(), "Saved session token");
        Ok(())
    }

    pub async fn clear(&self) -> ServiceResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ServiceError {
        ServiceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// The API handle plus whoever is signed in.
pub struct Session {
    api: Arc<dyn InventoryApi>,
    store: TokenStore,
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn new(api: Arc<dyn InventoryApi>, store: TokenStore) -> Self {
        Self {
            api,
            store,
            user: None,
        }
    }

    /// Picks up a previous login.
    ///
    /// `token_override` wins over the stored token and is never written back.
    /// A token the server rejects is dropped and the session starts signed out.
    pub async fn restore(
        api: Arc<dyn InventoryApi>,
        store: TokenStore,
        token_override: Option<String>,
    ) -> ServiceResult<Self> {
        let mut session = Self::new(api, store);

        let from_env = token_override.is_some();
        let token = match token_override {
            Some(token) => Some(token),
            None => session.store.load().await?,
        };

        let Some(token) = token else {
            return Ok(session);
        };

        session.api.set_token(Some(token));
        match session.api.current_user().await {
            Ok(user) => {
                debug!(username = %user.username, role = %user.role, "Restored session");
                session.user = Some(user);
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Stored session is no longer valid, signing out");
                session.api.set_token(None);
                if !from_env {
                    session.store.clear().await?;
                }
            }
            Err(e) => return Err(e.into()),
        }

        Ok(session)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ServiceResult<&User> {
        if username.trim().is_empty() {
            return Err(ValidationError::MissingField("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let response = self.api.login(username.trim(), password).await?;
        self.api.set_token(Some(response.access_token.clone()));

        let user = match response.user {
            Some(user) => user,
            None => self.api.current_user().await?,
        };

        self.store.save(&response.access_token).await?;
        info!(username = %user.username, role = %user.role, "Signed in");

        Ok(&*self.user.insert(user))
    }

    pub async fn logout(&mut self) -> ServiceResult<()> {
        self.api.set_token(None);
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "Signed out");
        }
        self.store.clear().await
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    pub fn require_user(&self) -> ServiceResult<&User> {
        self.user.as_ref().ok_or(ServiceError::NotSignedIn)
    }

    pub fn require_admin(&self, action: &str) -> ServiceResult<&User> {
        let user = self.require_user()?;
        if user.role.is_admin() {
            Ok(user)
        } else {
            Err(ServiceError::admin_only(action))
        }
    }

    #[must_use]
    pub fn access(&self, screen: Screen) -> Access {
        navigation::resolve(self.user.as_ref(), screen)
    }

    #[must_use]
    pub fn api(&self) -> &dyn InventoryApi {
        self.api.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> TokenStore {
        TokenStore::new(
            std::env::temp_dir()
                .join(format!("chemlab-session-{}", uuid::Uuid::new_v4()))
                .join("session"),
        )
    }

    #[tokio::test]
    async fn test_token_store_roundtrip() {
        let store = temp_store();
        assert_eq!(store.load().await.unwrap(), None);

        store.save("tok-123").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("tok-123"));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();

        if let Some(parent) = store.path().parent() {
            std::fs::remove_dir_all(parent).ok();
        }
    }

    #[tokio::test]
    async fn test_blank_token_file_is_ignored() {
        let store = temp_store();
        store.save("  \n").await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        if let Some(parent) = store.path().parent() {
            std::fs::remove_dir_all(parent).ok();
        }
    }
}
