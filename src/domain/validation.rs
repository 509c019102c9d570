//! Client-side form checks.
//!
//! These fail fast before a request is built. The server re-validates
//! everything and remains the authority.

use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;

use crate::constants::{limits, upload};
use crate::models::{
    Category, CategoryDraft, Item, ItemDraft, NewBorrowLog, NewUser, Role, User, UserUpdate,
    timestamp,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields (missing {0})")]
    MissingField(&'static str),

    #[error("Quantity must be at least 1")]
    QuantityTooSmall,

    #[error("Only {available} available, cannot borrow {requested}")]
    QuantityExceedsAvailable { requested: i64, available: i64 },

    #[error("Expected return date {date} is before today ({today})")]
    ReturnDateInPast { date: NaiveDate, today: NaiveDate },

    #[error("Item '{0}' cannot be borrowed right now")]
    ItemNotBorrowable(String),

    #[error("User '{0}' is inactive")]
    BorrowerInactive(String),

    #[error("User '{0}' is not a viewer account and cannot borrow items")]
    BorrowerNotViewer(String),

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("File type not allowed: {0} (use png, jpg, jpeg or gif)")]
    UnsupportedImage(String),

    #[error("File too large: {size} bytes (limit {max})")]
    ImageTooLarge { size: u64, max: u64 },

    #[error(
        "Cannot delete category '{name}' with {items_count} existing items. Please reassign or delete the items first."
    )]
    CategoryInUse { name: String, items_count: i64 },

    #[error("Nothing to update")]
    EmptyUpdate,

    #[error("{0}")]
    Invalid(String),
}

/// Borrow form as entered by an admin.
#[derive(Debug, Clone, Default)]
pub struct BorrowForm {
    pub item_id: Option<i64>,
    pub user_id: Option<i64>,
    pub quantity: i64,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Checks a borrow against the selected item and borrower and builds the
/// request payload. `admin` is the signed-in user authorising the borrow.
pub fn validate_borrow(
    form: &BorrowForm,
    item: &Item,
    borrower: &User,
    admin: &User,
    today: NaiveDate,
) -> Result<NewBorrowLog, ValidationError> {
    let checked = check_borrow_fields(form, today)?;

    if !item.is_borrowable_now() {
        return Err(ValidationError::ItemNotBorrowable(item.name.clone()));
    }

    if item.after_borrow(form.quantity).is_none() {
        return Err(ValidationError::QuantityExceedsAvailable {
            requested: form.quantity,
            available: item.available_quantity,
        });
    }

    check_borrower(borrower)?;

    Ok(NewBorrowLog {
        item_id: item.id,
        user_id: borrower.id,
        admin_id: admin.id,
        quantity_borrowed: form.quantity,
        expected_return_date: timestamp::start_of_day(checked.expected_return_date),
        notes: non_empty(form.notes.as_deref()),
    })
}

/// Borrow form fields that passed every check needing no server data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedBorrow {
    pub item_id: i64,
    pub user_id: i64,
    pub expected_return_date: NaiveDate,
}

/// Required fields, quantity floor and return date, checked before any
/// lookup is made.
pub fn check_borrow_fields(
    form: &BorrowForm,
    today: NaiveDate,
) -> Result<CheckedBorrow, ValidationError> {
    let item_id = form.item_id.ok_or(ValidationError::MissingField("item"))?;
    let user_id = form.user_id.ok_or(ValidationError::MissingField("user"))?;
    let expected = form
        .expected_return_date
        .ok_or(ValidationError::MissingField("expected return date"))?;

    if form.quantity < 1 {
        return Err(ValidationError::QuantityTooSmall);
    }

    if expected < today {
        return Err(ValidationError::ReturnDateInPast {
            date: expected,
            today,
        });
    }

    Ok(CheckedBorrow {
        item_id,
        user_id,
        expected_return_date: expected,
    })
}

pub fn check_borrower(user: &User) -> Result<(), ValidationError> {
    if !user.is_active {
        return Err(ValidationError::BorrowerInactive(user.full_name.clone()));
    }
    if user.role != Role::Viewer {
        return Err(ValidationError::BorrowerNotViewer(user.full_name.clone()));
    }
    Ok(())
}

pub fn validate_new_user(user: &NewUser, confirm_password: &str) -> Result<(), ValidationError> {
    require_text("username", &user.username)?;
    require_text("email", &user.email)?;
    require_text("full name", &user.full_name)?;

    if user.password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    check_password(&user.password)
}

/// Normalises an update: an empty password means "unchanged" and is dropped.
pub fn validate_user_update(mut update: UserUpdate) -> Result<UserUpdate, ValidationError> {
    if update.password.as_deref().is_some_and(str::is_empty) {
        update.password = None;
    }
    if let Some(password) = &update.password {
        check_password(password)?;
    }
    for (field, value) in [
        ("username", &update.username),
        ("email", &update.email),
        ("full name", &update.full_name),
    ] {
        if let Some(v) = value {
            require_text(field, v)?;
        }
    }
    Ok(update)
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < limits::MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: limits::MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn validate_item_draft(draft: &ItemDraft, creating: bool) -> Result<(), ValidationError> {
    if creating {
        if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingField("name"));
        }
        if draft.category_id.is_none() {
            return Err(ValidationError::MissingField("category"));
        }
        if draft.quantity.is_none() {
            return Err(ValidationError::MissingField("quantity"));
        }
    } else if draft.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    if let Some(name) = &draft.name {
        require_text("name", name)?;
    }
    if draft.quantity.is_some_and(|q| q < 0) {
        return Err(ValidationError::Invalid(
            "Quantity cannot be negative".to_string(),
        ));
    }
    if draft.min_stock_level.is_some_and(|m| m < 1) {
        return Err(ValidationError::Invalid(
            "Minimum stock level must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Checks an image before upload. `size` is the file length in bytes.
pub fn validate_image(path: &Path, size: u64) -> Result<(), ValidationError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !upload::ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedImage(path.display().to_string()));
    }
    if size > upload::MAX_FILE_SIZE {
        return Err(ValidationError::ImageTooLarge {
            size,
            max: upload::MAX_FILE_SIZE,
        });
    }
    Ok(())
}

pub fn validate_category_draft(draft: &CategoryDraft, creating: bool) -> Result<(), ValidationError> {
    match &draft.name {
        Some(name) => require_text("name", name),
        None if creating => Err(ValidationError::MissingField("name")),
        None if draft.description.is_none() => Err(ValidationError::EmptyUpdate),
        None => Ok(()),
    }
}

/// A category can only be deleted once no item refers to it.
pub fn ensure_category_deletable(category: &Category) -> Result<(), ValidationError> {
    if category.items_count > 0 {
        return Err(ValidationError::CategoryInUse {
            name: category.name.clone(),
            items_count: category.items_count,
        });
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;
    use std::path::PathBuf;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn item(available: i64) -> Item {
        Item {
            id: 3,
            name: "Burette".to_string(),
            description: None,
            category_id: Some(1),
            category: None,
            quantity: 10,
            available_quantity: available,
            unit: "pieces".to_string(),
            storage_location: None,
            condition: Condition::Good,
            min_stock_level: 2,
            expiry_date: None,
            is_borrowable: true,
            image_url: None,
        }
    }

    fn person(id: i64, role: Role, active: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@lab.test"),
            full_name: format!("User {id}"),
            student_id: None,
            role,
            is_active: active,
            created_at: None,
            profile_picture: None,
        }
    }

    fn form(quantity: i64) -> BorrowForm {
        BorrowForm {
            item_id: Some(3),
            user_id: Some(4),
            quantity,
            expected_return_date: NaiveDate::from_ymd_opt(2026, 10, 26),
            notes: Some("  for titration lab ".to_string()),
        }
    }

    #[test]
    fn test_valid_borrow_builds_payload() {
        let admin = person(1, Role::Admin, true);
        let borrower = person(4, Role::Viewer, true);
        let payload = validate_borrow(&form(2), &item(5), &borrower, &admin, today()).unwrap();

        assert_eq!(payload.item_id, 3);
        assert_eq!(payload.user_id, 4);
        assert_eq!(payload.admin_id, 1);
        assert_eq!(payload.quantity_borrowed, 2);
        assert_eq!(
            payload.expected_return_date.to_rfc3339(),
            "2026-10-26T00:00:00+00:00"
        );
        assert_eq!(payload.notes.as_deref(), Some("for titration lab"));
    }

    #[test]
    fn test_quantity_bounds() {
        let admin = person(1, Role::Admin, true);
        let borrower = person(4, Role::Viewer, true);

        assert_eq!(
            validate_borrow(&form(0), &item(5), &borrower, &admin, today()).unwrap_err(),
            ValidationError::QuantityTooSmall
        );
        assert_eq!(
            validate_borrow(&form(6), &item(5), &borrower, &admin, today()).unwrap_err(),
            ValidationError::QuantityExceedsAvailable {
                requested: 6,
                available: 5
            }
        );
        assert!(validate_borrow(&form(5), &item(5), &borrower, &admin, today()).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut f = form(1);
        f.user_id = None;
        assert_eq!(
            check_borrow_fields(&f, today()).unwrap_err(),
            ValidationError::MissingField("user")
        );

        let mut f = form(1);
        f.expected_return_date = None;
        assert_eq!(
            check_borrow_fields(&f, today()).unwrap_err(),
            ValidationError::MissingField("expected return date")
        );
    }

    #[test]
    fn test_form_checks_need_no_lookup() {
        assert_eq!(
            check_borrow_fields(&form(0), today()).unwrap_err(),
            ValidationError::QuantityTooSmall
        );

        let mut f = form(1);
        f.expected_return_date = today().pred_opt();
        assert!(matches!(
            check_borrow_fields(&f, today()),
            Err(ValidationError::ReturnDateInPast { .. })
        ));

        let checked = check_borrow_fields(&form(2), today()).unwrap();
        assert_eq!(checked.item_id, 3);
        assert_eq!(checked.user_id, 4);
        assert_eq!(checked.expected_return_date, NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
    }

    #[test]
    fn test_return_date_today_is_allowed_yesterday_is_not() {
        let admin = person(1, Role::Admin, true);
        let borrower = person(4, Role::Viewer, true);

        let mut f = form(1);
        f.expected_return_date = Some(today());
        assert!(validate_borrow(&f, &item(5), &borrower, &admin, today()).is_ok());

        f.expected_return_date = today().pred_opt();
        assert!(matches!(
            validate_borrow(&f, &item(5), &borrower, &admin, today()),
            Err(ValidationError::ReturnDateInPast { .. })
        ));
    }

    #[test]
    fn test_borrower_must_be_active_viewer() {
        let admin = person(1, Role::Admin, true);
        assert!(matches!(
            validate_borrow(&form(1), &item(5), &person(4, Role::Viewer, false), &admin, today()),
            Err(ValidationError::BorrowerInactive(_))
        ));
        assert!(matches!(
            validate_borrow(&form(1), &item(5), &person(4, Role::Admin, true), &admin, today()),
            Err(ValidationError::BorrowerNotViewer(_))
        ));
    }

    #[test]
    fn test_unborrowable_item() {
        let admin = person(1, Role::Admin, true);
        let borrower = person(4, Role::Viewer, true);
        let mut locked = item(5);
        locked.is_borrowable = false;
        assert!(matches!(
            validate_borrow(&form(1), &locked, &borrower, &admin, today()),
            Err(ValidationError::ItemNotBorrowable(_))
        ));
    }

    #[test]
    fn test_new_user_passwords() {
        let mut user = NewUser {
            username: "jdoe".to_string(),
            email: "jdoe@lab.test".to_string(),
            full_name: "Jane Doe".to_string(),
            student_id: None,
            role: Role::Viewer,
            password: "secret1".to_string(),
        };
        assert!(validate_new_user(&user, "secret1").is_ok());
        assert_eq!(
            validate_new_user(&user, "secret2").unwrap_err(),
            ValidationError::PasswordMismatch
        );

        user.password = "abc".to_string();
        assert_eq!(
            validate_new_user(&user, "abc").unwrap_err(),
            ValidationError::PasswordTooShort { min: 6 }
        );
    }

    #[test]
    fn test_update_drops_empty_password() {
        let update = UserUpdate {
            full_name: Some("Jane Q. Doe".to_string()),
            password: Some(String::new()),
            ..UserUpdate::default()
        };
        let cleaned = validate_user_update(update).unwrap();
        assert!(cleaned.password.is_none());
    }

    #[test]
    fn test_image_checks() {
        assert!(validate_image(&PathBuf::from("beaker.PNG"), 1024).is_ok());
        assert!(matches!(
            validate_image(&PathBuf::from("beaker.bmp"), 1024),
            Err(ValidationError::UnsupportedImage(_))
        ));
        assert!(matches!(
            validate_image(&PathBuf::from("beaker.jpg"), 6 * 1024 * 1024),
            Err(ValidationError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_item_draft_checks() {
        assert!(validate_item_draft(&ItemDraft::new_item("Flask", 1, 0), true).is_ok());
        assert_eq!(
            validate_item_draft(&ItemDraft::default(), true).unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert_eq!(
            validate_item_draft(&ItemDraft::default(), false).unwrap_err(),
            ValidationError::EmptyUpdate
        );

        let negative = ItemDraft {
            quantity: Some(-1),
            ..ItemDraft::default()
        };
        assert!(validate_item_draft(&negative, false).is_err());
    }

    #[test]
    fn test_category_with_items_is_not_deletable() {
        let mut category = Category {
            id: 1,
            name: "Glassware".to_string(),
            description: None,
            items_count: 3,
        };
        assert!(matches!(
            ensure_category_deletable(&category),
            Err(ValidationError::CategoryInUse { items_count: 3, .. })
        ));

        category.items_count = 0;
        assert!(ensure_category_deletable(&category).is_ok());
    }

    #[test]
    fn test_category_draft() {
        assert!(validate_category_draft(&CategoryDraft::default(), true).is_err());
        assert!(
            validate_category_draft(
                &CategoryDraft {
                    name: Some("Reagents".to_string()),
                    description: None
                },
                true
            )
            .is_ok()
        );
    }
}
