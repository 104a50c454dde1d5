//! In-memory store for tests
//!
//! Mirrors the remote store's contract (server-assigned ids, month-prefix
//! filters, NotFound on missing ids) without any network. Cloning shares
//! the underlying data, like cloning the HTTP-backed store shares the
//! remote.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Category, Expense, Goal, Subcategory};

use super::{month_prefix, Store};

#[derive(Default)]
struct Inner {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    goals: Vec<Goal>,
    next_id: u64,
}

impl Inner {
    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// Store kept entirely in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the taxonomy tables, assigning ids to rows that lack them.
    /// Returns the stored rows so tests can reference the ids.
    pub fn seed_taxonomy(
        &self,
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
    ) -> (Vec<Category>, Vec<Subcategory>) {
        let mut inner = self.inner.lock().expect("memory store lock");
        for mut category in categories {
            if category.id.is_none() {
                category.id = Some(inner.assign_id("cat"));
            }
            inner.categories.push(category);
        }
        for mut subcategory in subcategories {
            if subcategory.id.is_none() {
                subcategory.id = Some(inner.assign_id("sub"));
            }
            inner.subcategories.push(subcategory);
        }
        (inner.categories.clone(), inner.subcategories.clone())
    }

    /// Seed goals, assigning missing ids.
    pub fn seed_goals(&self, goals: Vec<Goal>) -> Vec<Goal> {
        let mut inner = self.inner.lock().expect("memory store lock");
        for mut goal in goals {
            if goal.id.is_none() {
                goal.id = Some(inner.assign_id("meta"));
            }
            inner.goals.push(goal);
        }
        inner.goals.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_expense(&self, expense: &Expense) -> Result<Expense> {
        let mut inner = self.lock();
        let mut stored = expense.clone();
        stored.id = Some(inner.assign_id("exp"));
        inner.expenses.push(stored.clone());
        Ok(stored)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.lock().expenses.clone())
    }

    async fn list_expenses_for_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        let prefix = month_prefix(year, month);
        Ok(self
            .lock()
            .expenses
            .iter()
            .filter(|e| e.date.to_string().starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        Ok(self
            .lock()
            .expenses
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned())
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Expense> {
        let id = expense
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidData("expense has no id to update by".into()))?;
        let mut inner = self.lock();
        let slot = inner
            .expenses
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("despesas id {}", id)))?;
        *slot = expense.clone();
        Ok(expense.clone())
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.expenses.len();
        inner.expenses.retain(|e| e.id.as_deref() != Some(id));
        if inner.expenses.len() == before {
            return Err(Error::NotFound(format!("despesas id {}", id)));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, category: &Category) -> Result<Category> {
        let mut inner = self.lock();
        let mut stored = category.clone();
        stored.id = Some(inner.assign_id("cat"));
        inner.categories.push(stored.clone());
        Ok(stored)
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let id = category
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidData("category has no id to update by".into()))?;
        let mut inner = self.lock();
        let slot = inner
            .categories
            .iter_mut()
            .find(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("categoria id {}", id)))?;
        *slot = category.clone();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id.as_deref() != Some(id));
        if inner.categories.len() == before {
            return Err(Error::NotFound(format!("categoria id {}", id)));
        }
        Ok(())
    }

    async fn list_subcategories(&self, category_id: Option<&str>) -> Result<Vec<Subcategory>> {
        let mut subcategories: Vec<Subcategory> = self
            .lock()
            .subcategories
            .iter()
            .filter(|s| category_id.is_none() || Some(s.category_id.as_str()) == category_id)
            .cloned()
            .collect();
        subcategories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subcategories)
    }

    async fn create_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        let mut inner = self.lock();
        let mut stored = subcategory.clone();
        stored.id = Some(inner.assign_id("sub"));
        inner.subcategories.push(stored.clone());
        Ok(stored)
    }

    async fn update_subcategory(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        let id = subcategory
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidData("subcategory has no id to update by".into()))?;
        let mut inner = self.lock();
        let slot = inner
            .subcategories
            .iter_mut()
            .find(|s| s.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("subcategoria id {}", id)))?;
        *slot = subcategory.clone();
        Ok(subcategory.clone())
    }

    async fn delete_subcategory(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.subcategories.len();
        inner.subcategories.retain(|s| s.id.as_deref() != Some(id));
        if inner.subcategories.len() == before {
            return Err(Error::NotFound(format!("subcategoria id {}", id)));
        }
        Ok(())
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.lock().goals.clone())
    }

    async fn list_goals_for_month(&self, year: i32, month: u32) -> Result<Vec<Goal>> {
        let prefix = month_prefix(year, month);
        Ok(self
            .lock()
            .goals
            .iter()
            .filter(|g| {
                g.start_date
                    .map(|d| d.to_string().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn create_goal(&self, goal: &Goal) -> Result<Goal> {
        let mut inner = self.lock();
        let mut stored = goal.clone();
        stored.id = Some(inner.assign_id("meta"));
        inner.goals.push(stored.clone());
        Ok(stored)
    }

    async fn update_goal(&self, goal: &Goal) -> Result<Goal> {
        let id = goal
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidData("goal has no id to update by".into()))?;
        let mut inner = self.lock();
        let slot = inner
            .goals
            .iter_mut()
            .find(|g| g.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("metas id {}", id)))?;
        *slot = goal.clone();
        Ok(goal.clone())
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.goals.len();
        inner.goals.retain(|g| g.id.as_deref() != Some(id));
        if inner.goals.len() == before {
            return Err(Error::NotFound(format!("metas id {}", id)));
        }
        Ok(())
    }
}
