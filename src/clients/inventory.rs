use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::api::{ApiError, InventoryApi};
use super::filters::{BorrowLogFilter, ItemFilter};
use crate::config::ApiConfig;
use crate::constants::{USER_AGENT, limits};
use crate::models::{
    BorrowLog, Category, CategoryDraft, DashboardStats, HealthStatus, Item, ItemDraft,
    LoginResponse, NewBorrowLog, NewUser, ReturnRequest, User, UserUpdate,
};

/// reqwest-backed client for the inventory REST API.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl InventoryClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.base_url))?)
    }

    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await?;
        let response = Self::check(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, response = %truncate(&text), "Failed to parse API response");
            ApiError::Decode(e.to_string())
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        debug!(status = %status, detail = %detail, "API request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
            StatusCode::NOT_FOUND => ApiError::NotFound(detail),
            _ => ApiError::Status {
                status: status.as_u16(),
                detail,
            },
        })
    }

    async fn item_form(draft: &ItemDraft) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in draft.form_fields() {
            form = form.text(key, value);
        }

        if let Some(path) = &draft.image {
            form = form.part("image", image_part(path).await?);
        }

        Ok(form)
    }
}

async fn image_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Request(format!("cannot read {}: {e}", path.display())))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())?)
}

/// Pulls a human readable message out of an error body.
///
/// Understands `{"detail": "..."}` and validation lists of the form
/// `{"detail": [{"msg": "..."}]}`; falls back to the raw body.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(truncate(body));
    };

    match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                Some(truncate(body))
            } else {
                Some(messages.join("; "))
            }
        }
        _ => Some(truncate(body)),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > limits::MAX_ERROR_BODY {
        let cut: String = text.chars().take(limits::MAX_ERROR_BODY).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("/health")?;
        let response = self.client.get(url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("/auth/login")?;
        let params = [("username", username), ("password", password)];

        let response = self.client.post(url).form(&params).send().await?;
        let response = Self::check(response).await?;
        let login: LoginResponse = response.json().await?;

        debug!(username = %username, "Authenticated with inventory API");
        Ok(login)
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint("/auth/me")?;
        self.send(self.client.get(url)).await
    }

    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, ApiError> {
        let mut url = self.endpoint("/items")?;
        filter.apply(&mut url);
        debug!(url = %url, "Loading items");
        self.send(self.client.get(url)).await
    }

    async fn get_item(&self, id: i64) -> Result<Item, ApiError> {
        let url = self.endpoint(&format!("/items/{id}"))?;
        self.send(self.client.get(url)).await
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        let url = self.endpoint("/items")?;
        let form = Self::item_form(draft).await?;
        let item: Item = self.send(self.client.post(url).multipart(form)).await?;
        info!(id = item.id, name = %item.name, "Created item");
        Ok(item)
    }

    async fn update_item(&self, id: i64, draft: &ItemDraft) -> Result<Item, ApiError> {
        let url = self.endpoint(&format!("/items/{id}"))?;
        let form = Self::item_form(draft).await?;
        let item: Item = self.send(self.client.put(url).multipart(form)).await?;
        info!(id = item.id, "Updated item");
        Ok(item)
    }

    async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/items/{id}"))?;
        self.send_empty(self.client.delete(url)).await?;
        info!(id, "Deleted item");
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("/categories")?;
        self.send(self.client.get(url)).await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError> {
        let url = self.endpoint("/categories")?;
        let category: Category = self.send(self.client.post(url).json(draft)).await?;
        info!(id = category.id, name = %category.name, "Created category");
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i64,
        draft: &CategoryDraft,
    ) -> Result<Category, ApiError> {
        let url = self.endpoint(&format!("/categories/{id}"))?;
        let category: Category = self.send(self.client.put(url).json(draft)).await?;
        info!(id, "Updated category");
        Ok(category)
    }

    async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/categories/{id}"))?;
        self.send_empty(self.client.delete(url)).await?;
        info!(id, "Deleted category");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint("/users")?;
        self.send(self.client.get(url)).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let url = self.endpoint("/users")?;
        let created: User = self.send(self.client.post(url).json(user)).await?;
        info!(id = created.id, username = %created.username, "Created user");
        Ok(created)
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("/users/{id}"))?;
        let user: User = self.send(self.client.put(url).json(update)).await?;
        info!(id, "Updated user");
        Ok(user)
    }

    async fn list_borrow_logs(
        &self,
        filter: &BorrowLogFilter,
    ) -> Result<Vec<BorrowLog>, ApiError> {
        let mut url = self.endpoint("/borrow-logs")?;
        filter.apply(&mut url);
        debug!(url = %url, "Loading borrow logs");
        self.send(self.client.get(url)).await
    }

    async fn create_borrow_log(&self, log: &NewBorrowLog) -> Result<BorrowLog, ApiError> {
        let url = self.endpoint("/borrow-logs")?;
        let created: BorrowLog = self.send(self.client.post(url).json(log)).await?;
        info!(
            id = created.id,
            item_id = log.item_id,
            user_id = log.user_id,
            quantity = log.quantity_borrowed,
            "Created borrow log"
        );
        Ok(created)
    }

    async fn return_borrow_log(
        &self,
        id: i64,
        request: &ReturnRequest,
    ) -> Result<BorrowLog, ApiError> {
        let url = self.endpoint(&format!("/borrow-logs/{id}/return"))?;
        let log: BorrowLog = self.send(self.client.post(url).json(request)).await?;
        info!(id, "Marked borrow as returned");
        Ok(log)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint("/dashboard/stats")?;
        self.send(self.client.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Not enough items available"}"#).as_deref(),
            Some("Not enough items available")
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "quantity"], "msg": "field required"}]}"#;
        assert_eq!(error_detail(body).as_deref(), Some("field required"));
    }

    #[test]
    fn test_error_detail_plain_text() {
        assert_eq!(
            error_detail("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert!(error_detail("   ").is_none());
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(limits::MAX_ERROR_BODY + 10);
        let cut = truncate(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), limits::MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = InventoryClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("/items").unwrap().as_str(),
            "http://localhost:8000/api/items"
        );
    }

    #[test]
    fn test_token_swap() {
        let client = InventoryClient::new(&ApiConfig::default()).unwrap();
        assert!(client.token().is_none());
        client.set_token(Some("abc".to_string()));
        assert_eq!(client.token().as_deref(), Some("abc"));
        client.set_token(None);
        assert!(client.token().is_none());
    }
}
