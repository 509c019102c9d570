use super::{ServiceError, ServiceResult, Session};
use crate::domain::validation;
use crate::models::{NewUser, Role, User, UserUpdate};

pub struct UserService<'a> {
    session: &'a Session,
}

impl<'a> UserService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        self.session.require_admin("Managing users")?;
        Ok(self.session.api().list_users().await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<User> {
        self.list()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("User {id}")))
    }

    /// Accounts that may be picked as borrowers.
    pub async fn eligible_borrowers(&self) -> ServiceResult<Vec<User>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|u| u.is_active && u.role == Role::Viewer)
            .collect())
    }

    pub async fn create(&self, user: &NewUser, confirm_password: &str) -> ServiceResult<User> {
        self.session.require_admin("Adding users")?;
        validation::validate_new_user(user, confirm_password)?;
        Ok(self.session.api().create_user(user).await?)
    }

    pub async fn update(&self, id: i64, update: UserUpdate) -> ServiceResult<User> {
        self.session.require_admin("Editing users")?;
        let update = validation::validate_user_update(update)?;
        Ok(self.session.api().update_user(id, &update).await?)
    }

    /// Accounts are never deleted, only switched off.
    pub async fn set_active(&self, user: &User, active: bool) -> ServiceResult<User> {
        let admin = self.session.require_admin("Activating or deactivating users")?;
        if !active && admin.id == user.id {
            return Err(ServiceError::Blocked(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let update = UserUpdate {
            is_active: Some(active),
            ..UserUpdate::default()
        };
        Ok(self.session.api().update_user(user.id, &update).await?)
    }
}
