//! Postgrest-backed store
//!
//! Talks to a hosted Postgrest-compatible REST API (Supabase in the
//! reference deployment): `{base}/rest/v1/{table}` with the anon key in
//! both the `apikey` and `Authorization` headers. Writes ask for
//! `return=representation` so the server-assigned row comes back in the
//! same round trip.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Expense, Goal, Subcategory};

use super::{month_prefix, Store};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Store backed by a Postgrest REST endpoint.
#[derive(Clone)]
pub struct PostgrestStore {
    http_client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl PostgrestStore {
    /// Create a new store. Every request carries an explicit timeout so a
    /// stalled remote cannot hang the SMS worker.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from `SUPABASE_URL` / `SUPABASE_KEY`. Returns None when
    /// either variable is missing.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("SUPABASE_URL").ok()?;
        let key = std::env::var("SUPABASE_KEY").ok()?;
        Some(Self::new(&url, &key))
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, table: &str, query: &[(&str, String)]) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .query(query)
    }

    async fn fail(table: &str, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Error::Store(format!("{} request failed ({}): {}", table, status, body))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self.request(Method::GET, table, query).send().await?;
        if !response.status().is_success() {
            return Err(Self::fail(table, response).await);
        }
        let rows: Vec<T> = response.json().await?;
        debug!(table, rows = rows.len(), "select");
        Ok(rows)
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) -> Result<T> {
        let response = self
            .request(Method::POST, table, &[])
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(table, response).await);
        }
        let mut rows: Vec<T> = response.json().await?;
        rows.pop()
            .ok_or_else(|| Error::Store(format!("{} insert returned no row", table)))
    }

    /// PATCH one row by primary key. Postgrest answers with the updated
    /// rows; an empty answer means the id matched nothing.
    async fn update<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        id_column: &str,
        id: &str,
        row: &T,
    ) -> Result<T> {
        let response = self
            .request(
                Method::PATCH,
                table,
                &[(id_column, format!("eq.{}", id))],
            )
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(table, response).await);
        }
        let mut rows: Vec<T> = response.json().await?;
        rows.pop()
            .ok_or_else(|| Error::NotFound(format!("{} id {}", table, id)))
    }

    async fn delete(&self, table: &str, id_column: &str, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, table, &[(id_column, format!("eq.{}", id))])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("{} id {}", table, id)));
        }
        if !response.status().is_success() {
            return Err(Self::fail(table, response).await);
        }
        Ok(())
    }

    fn require_id<'a>(entity: &str, id: Option<&'a str>) -> Result<&'a str> {
        id.ok_or_else(|| Error::InvalidData(format!("{} has no id to update by", entity)))
    }
}

#[async_trait]
impl Store for PostgrestStore {
    async fn insert_expense(&self, expense: &Expense) -> Result<Expense> {
        self.insert("despesas", expense).await
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.select("despesas", &[("select", "*".to_string())]).await
    }

    async fn list_expenses_for_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        self.select(
            "despesas",
            &[
                ("select", "*".to_string()),
                (
                    "data_despesa",
                    format!("like.{}*", month_prefix(year, month)),
                ),
            ],
        )
        .await
    }

    async fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        let mut rows: Vec<Expense> = self
            .select(
                "despesas",
                &[
                    ("select", "*".to_string()),
                    ("id_despesa", format!("eq.{}", id)),
                ],
            )
            .await?;
        Ok(rows.pop())
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Expense> {
        let id = Self::require_id("expense", expense.id.as_deref())?;
        self.update("despesas", "id_despesa", id, expense).await
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        self.delete("despesas", "id_despesa", id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .select("categoria", &[("select", "*".to_string())])
            .await?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, category: &Category) -> Result<Category> {
        self.insert("categoria", category).await
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let id = Self::require_id("category", category.id.as_deref())?;
        self.update("categoria", "id_categoria", id, category).await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete("categoria", "id_categoria", id).await
    }

    async fn list_subcategories(&self, category_id: Option<&str>) -> Result<Vec<Subcategory>> {
        let mut query = vec![("select", "*".to_string())];
        if let Some(category_id) = category_id {
            query.push(("id_categoria", format!("eq.{}", category_id)));
        }
        let mut subcategories: Vec<Subcategory> = self.select("subcategoria", &query).await?;
        subcategories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subcategories)
    }

    async fn create_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        self.insert("subcategoria", subcategory).await
    }

    async fn update_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        let id = Self::require_id("subcategory", subcategory.id.as_deref())?;
        self.update("subcategoria", "id_subcategoria", id, subcategory)
            .await
    }

    async fn delete_subcategory(&self, id: &str) -> Result<()> {
        self.delete("subcategoria", "id_subcategoria", id).await
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.select("metas", &[("select", "*".to_string())]).await
    }

    async fn list_goals_for_month(&self, year: i32, month: u32) -> Result<Vec<Goal>> {
        self.select(
            "metas",
            &[
                ("select", "*".to_string()),
                (
                    "data_inicio",
                    format!("like.{}*", month_prefix(year, month)),
                ),
            ],
        )
        .await
    }

    async fn create_goal(&self, goal: &Goal) -> Result<Goal> {
        self.insert("metas", goal).await
    }

    async fn update_goal(&self, goal: &Goal) -> Result<Goal> {
        let id = Self::require_id("goal", goal.id.as_deref())?;
        self.update("metas", "id_meta", id, goal).await
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        self.delete("metas", "id_meta", id).await
    }
}
