use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::BackendError;
use crate::core::item::Item;
use crate::core::reminder::Reminder;

/// REST client for the data tables. One instance per session; the access
/// token is baked in at construction and a fresh client is built after a
/// token refresh.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: &str, anon_key: &str, access_token: &str) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {access_token}")) {
            headers.insert(AUTHORIZATION, bearer);
        }
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json")
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, BackendError> {
        let resp = self.request(Method::GET, path).send().await?;
        if !resp.status().is_success() {
            return Err(BackendError::from_response(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// POST a row and return the representation the backend stored.
    async fn insert_row<T>(&self, path: &str, row: &T) -> Result<T, BackendError>
    where
        T: Serialize + DeserializeOwned,
    {
        let resp = self
            .request(Method::POST, path)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::from_response(resp).await);
        }
        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(BackendError::Empty);
        }
        Ok(rows.remove(0))
    }

    async fn update_row<T>(&self, path: &str, id: Uuid, row: &T) -> Result<T, BackendError>
    where
        T: Serialize + DeserializeOwned,
    {
        let resp = self
            .request(Method::PATCH, &format!("{path}?id=eq.{id}"))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::from_response(resp).await);
        }
        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(BackendError::Empty);
        }
        Ok(rows.remove(0))
    }

    async fn delete_row(&self, path: &str, id: Uuid) -> Result<(), BackendError> {
        let resp = self
            .request(Method::DELETE, &format!("{path}?id=eq.{id}"))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::from_response(resp).await);
        }
        Ok(())
    }

    pub async fn fetch_items(&self, user_id: Uuid) -> Result<Vec<Item>, BackendError> {
        self.fetch_rows(&format!(
            "/rest/v1/goals?user_id=eq.{user_id}&select=*&order=priority.asc"
        ))
        .await
    }

    pub async fn fetch_reminders(&self, user_id: Uuid) -> Result<Vec<Reminder>, BackendError> {
        self.fetch_rows(&format!(
            "/rest/v1/reminders?user_id=eq.{user_id}&select=*&order=created_at.asc"
        ))
        .await
    }

    pub async fn insert_item(&self, item: &Item) -> Result<Item, BackendError> {
        self.insert_row("/rest/v1/goals", item).await
    }

    pub async fn update_item(&self, item: &Item) -> Result<Item, BackendError> {
        self.update_row("/rest/v1/goals", item.id, item).await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), BackendError> {
        self.delete_row("/rest/v1/goals", id).await
    }

    pub async fn insert_reminder(&self, reminder: &Reminder) -> Result<Reminder, BackendError> {
        self.insert_row("/rest/v1/reminders", reminder).await
    }

    pub async fn update_reminder(&self, reminder: &Reminder) -> Result<Reminder, BackendError> {
        self.update_row("/rest/v1/reminders", reminder.id, reminder)
            .await
    }

    pub async fn delete_reminder(&self, id: Uuid) -> Result<(), BackendError> {
        self.delete_row("/rest/v1/reminders", id).await
    }

    /// Persist the priorities assigned by a drag reorder. One PATCH per row;
    /// reorders touch a handful of rows at most.
    pub async fn save_priorities(&self, items: &[Item]) -> Result<(), BackendError> {
        for item in items {
            let resp = self
                .request(
                    Method::PATCH,
                    &format!("/rest/v1/goals?id=eq.{}", item.id),
                )
                .json(&serde_json::json!({ "priority": item.priority }))
                .send()
                .await?;
            if !resp.status().is_success() {
                return Err(BackendError::from_response(resp).await);
            }
        }
        Ok(())
    }
}
