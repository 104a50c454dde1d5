//! Persistence gateway
//!
//! All entity CRUD flows through the [`Store`] trait. The real backend is a
//! hosted Postgrest-compatible REST API ([`PostgrestStore`]); tests wire in
//! the in-memory [`MemoryStore`]. [`StoreClient`] is the concrete wrapper
//! providing Clone and compile-time dispatch, in the same shape as the LLM
//! client enum.
//!
//! Every operation returns `Result`: an empty table and a failed fetch are
//! different answers, and callers render them differently.

mod memory;
mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, Expense, Goal, Subcategory};

/// Gateway to the four remote tables.
#[async_trait]
pub trait Store: Send + Sync {
    // --- despesas ---

    /// Insert a new expense; returns the stored row with its server id.
    async fn insert_expense(&self, expense: &Expense) -> Result<Expense>;

    async fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// Expenses whose date falls in `year`-`month` (date-prefix filter).
    async fn list_expenses_for_month(&self, year: i32, month: u32) -> Result<Vec<Expense>>;

    async fn get_expense(&self, id: &str) -> Result<Option<Expense>>;

    /// Full-record replace keyed by id. `Error::NotFound` when the id does
    /// not exist.
    async fn update_expense(&self, expense: &Expense) -> Result<Expense>;

    async fn delete_expense(&self, id: &str) -> Result<()>;

    // --- categoria ---

    /// All categories, sorted by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn create_category(&self, category: &Category) -> Result<Category>;

    async fn update_category(&self, category: &Category) -> Result<Category>;

    async fn delete_category(&self, id: &str) -> Result<()>;

    // --- subcategoria ---

    /// Subcategories sorted by name, optionally scoped to one category.
    async fn list_subcategories(&self, category_id: Option<&str>) -> Result<Vec<Subcategory>>;

    async fn create_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory>;

    async fn update_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory>;

    async fn delete_subcategory(&self, id: &str) -> Result<()>;

    // --- metas ---

    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Goals whose start date falls in `year`-`month`.
    async fn list_goals_for_month(&self, year: i32, month: u32) -> Result<Vec<Goal>>;

    async fn create_goal(&self, goal: &Goal) -> Result<Goal>;

    async fn update_goal(&self, goal: &Goal) -> Result<Goal>;

    async fn delete_goal(&self, id: &str) -> Result<()>;
}

/// Concrete store enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum StoreClient {
    /// Hosted Postgrest-compatible REST API
    Postgrest(PostgrestStore),
    /// In-memory store for tests
    Memory(MemoryStore),
}

impl StoreClient {
    /// Create a store from `SUPABASE_URL` / `SUPABASE_KEY`.
    pub fn from_env() -> Option<Self> {
        PostgrestStore::from_env().map(StoreClient::Postgrest)
    }

    pub fn memory() -> Self {
        StoreClient::Memory(MemoryStore::new())
    }
}

macro_rules! delegate {
    ($self:ident, $inner:ident, $call:expr) => {
        match $self {
            StoreClient::Postgrest($inner) => $call,
            StoreClient::Memory($inner) => $call,
        }
    };
}

#[async_trait]
impl Store for StoreClient {
    async fn insert_expense(&self, expense: &Expense) -> Result<Expense> {
        delegate!(self, s, s.insert_expense(expense).await)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        delegate!(self, s, s.list_expenses().await)
    }

    async fn list_expenses_for_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        delegate!(self, s, s.list_expenses_for_month(year, month).await)
    }

    async fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        delegate!(self, s, s.get_expense(id).await)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Expense> {
        delegate!(self, s, s.update_expense(expense).await)
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        delegate!(self, s, s.delete_expense(id).await)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        delegate!(self, s, s.list_categories().await)
    }

    async fn create_category(&self, category: &Category) -> Result<Category> {
        delegate!(self, s, s.create_category(category).await)
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        delegate!(self, s, s.update_category(category).await)
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        delegate!(self, s, s.delete_category(id).await)
    }

    async fn list_subcategories(&self, category_id: Option<&str>) -> Result<Vec<Subcategory>> {
        delegate!(self, s, s.list_subcategories(category_id).await)
    }

    async fn create_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        delegate!(self, s, s.create_subcategory(subcategory).await)
    }

    async fn update_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        delegate!(self, s, s.update_subcategory(subcategory).await)
    }

    async fn delete_subcategory(&self, id: &str) -> Result<()> {
        delegate!(self, s, s.delete_subcategory(id).await)
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        delegate!(self, s, s.list_goals().await)
    }

    async fn list_goals_for_month(&self, year: i32, month: u32) -> Result<Vec<Goal>> {
        delegate!(self, s, s.list_goals_for_month(year, month).await)
    }

    async fn create_goal(&self, goal: &Goal) -> Result<Goal> {
        delegate!(self, s, s.create_goal(goal).await)
    }

    async fn update_goal(&self, goal: &Goal) -> Result<Goal> {
        delegate!(self, s, s.update_goal(goal).await)
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        delegate!(self, s, s.delete_goal(id).await)
    }
}

/// The `YYYY-MM` prefix used by month-scoped date filters.
pub(crate) fn month_prefix(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_prefix() {
        assert_eq!(month_prefix(2024, 5), "2024-05");
        assert_eq!(month_prefix(2024, 12), "2024-12");
        assert_eq!(month_prefix(987, 1), "0987-01");
    }
}
