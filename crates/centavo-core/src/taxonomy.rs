//! Taxonomy resolution
//!
//! A [`Taxonomy`] is one snapshot of the category/subcategory tables.
//! Lookups are accent- and case-insensitive through [`crate::text::normalize`].
//! There is no caching here: a snapshot answers for the lists it was built
//! from, and freshness is the caller's responsibility.

use crate::models::{Category, Expense, ExpenseView, Goal, GoalView, Subcategory};
use crate::text::normalize;

/// One fetched snapshot of the classification tree.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>, subcategories: Vec<Subcategory>) -> Self {
        Self {
            categories,
            subcategories,
        }
    }

    /// True when there are no subcategories at all. The SMS pipeline cannot
    /// classify against an empty tree.
    pub fn is_empty(&self) -> bool {
        self.subcategories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    /// Resolve a category by name: normalized equality first, then a plain
    /// case-insensitive fallback.
    pub fn resolve_category(&self, name: &str) -> Option<&Category> {
        let wanted = normalize(name);
        self.categories
            .iter()
            .find(|c| normalize(&c.name) == wanted)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
            })
    }

    /// Resolve a subcategory id given category and subcategory names.
    /// Returns `None` when either lookup fails; the caller decides whether
    /// that is a diagnostic or an error.
    pub fn resolve_subcategory_id(
        &self,
        category_name: &str,
        subcategory_name: &str,
    ) -> Option<&str> {
        let category_id = self.resolve_category(category_name)?.id.as_deref()?;
        let wanted = normalize(subcategory_name);
        self.subcategories
            .iter()
            .find(|s| s.category_id == category_id && normalize(&s.name) == wanted)
            .and_then(|s| s.id.as_deref())
    }

    /// Names of the subcategories under a category, empty when the category
    /// name does not resolve.
    pub fn subcategory_names(&self, category_name: &str) -> Vec<String> {
        let Some(category_id) = self
            .resolve_category(category_name)
            .and_then(|c| c.id.as_deref())
        else {
            return Vec::new();
        };
        self.subcategories
            .iter()
            .filter(|s| s.category_id == category_id)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.as_deref() == Some(id))
    }

    pub fn subcategory_by_id(&self, id: &str) -> Option<&Subcategory> {
        self.subcategories
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
    }

    /// Join display names into an expense at read time. Names stay `None`
    /// when the subcategory id no longer resolves against this snapshot.
    pub fn expense_view(&self, expense: &Expense) -> ExpenseView {
        let subcategory = self.subcategory_by_id(&expense.subcategory_id);
        let category = subcategory.and_then(|s| self.category_by_id(&s.category_id));
        ExpenseView {
            id: expense.id.clone(),
            amount: expense.amount,
            date: expense.date,
            location: expense.location.clone(),
            detail: expense.detail.clone(),
            time: expense.time.clone(),
            card: expense.card.clone(),
            card_last4: expense.card_last4,
            status: expense.status,
            month: expense.month(),
            category: category.map(|c| c.name.clone()),
            subcategory: subcategory.map(|s| s.name.clone()),
        }
    }

    pub fn goal_view(&self, goal: &Goal) -> GoalView {
        GoalView {
            id: goal.id.clone(),
            target: goal.target,
            period: goal.period.clone(),
            start_date: goal.start_date,
            category: self
                .category_by_id(&goal.category_id)
                .map(|c| c.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample() -> Taxonomy {
        Taxonomy::new(
            vec![
                Category {
                    id: Some("1".to_string()),
                    name: "Alimentação".to_string(),
                },
                Category {
                    id: Some("2".to_string()),
                    name: "Transporte".to_string(),
                },
            ],
            vec![
                Subcategory {
                    id: Some("10".to_string()),
                    category_id: "1".to_string(),
                    name: "Restaurante".to_string(),
                },
                Subcategory {
                    id: Some("11".to_string()),
                    category_id: "1".to_string(),
                    name: "Supermercado".to_string(),
                },
                Subcategory {
                    id: Some("20".to_string()),
                    category_id: "2".to_string(),
                    name: "Combustível".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_resolve_category_accent_insensitive() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.resolve_category("alimentacao").unwrap().name,
            "Alimentação"
        );
        assert_eq!(
            taxonomy.resolve_category("ALIMENTAÇÃO  ").unwrap().name,
            "Alimentação"
        );
        assert!(taxonomy.resolve_category("Lazer").is_none());
    }

    #[test]
    fn test_resolve_subcategory_id() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.resolve_subcategory_id("alimentacao", "restaurante"),
            Some("10")
        );
        assert_eq!(
            taxonomy.resolve_subcategory_id("transporte", "combustivel"),
            Some("20")
        );
        // Subcategory lookups are scoped to the resolved category
        assert_eq!(
            taxonomy.resolve_subcategory_id("transporte", "restaurante"),
            None
        );
        assert_eq!(
            taxonomy.resolve_subcategory_id("desconhecida", "restaurante"),
            None
        );
    }

    #[test]
    fn test_subcategory_names() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.subcategory_names("Alimentação"),
            vec!["Restaurante".to_string(), "Supermercado".to_string()]
        );
        assert!(taxonomy.subcategory_names("nope").is_empty());
    }

    #[test]
    fn test_expense_view_joins_names() {
        let taxonomy = sample();
        let expense = Expense {
            id: Some("e1".to_string()),
            amount: Decimal::new(15732, 2),
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            subcategory_id: "11".to_string(),
            location: Some("Supermercado Central".to_string()),
            detail: None,
            time: None,
            card: None,
            card_last4: None,
            status: None,
            due_date: None,
            created_at: None,
        };
        let view = taxonomy.expense_view(&expense);
        assert_eq!(view.category.as_deref(), Some("Alimentação"));
        assert_eq!(view.subcategory.as_deref(), Some("Supermercado"));
        assert_eq!(view.month, 5);
    }

    #[test]
    fn test_expense_view_unresolvable_subcategory() {
        let taxonomy = sample();
        let expense = Expense {
            id: None,
            amount: Decimal::ONE,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            subcategory_id: "999".to_string(),
            location: None,
            detail: None,
            time: None,
            card: None,
            card_last4: None,
            status: None,
            due_date: None,
            created_at: None,
        };
        let view = taxonomy.expense_view(&expense);
        assert!(view.category.is_none());
        assert!(view.subcategory.is_none());
    }
}
