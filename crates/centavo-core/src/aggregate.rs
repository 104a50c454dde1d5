//! Expense aggregation engine
//!
//! Pure functions over already-fetched expense and goal views. All currency
//! arithmetic is `Decimal`; nothing here touches the network.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{ExpenseView, GoalView, SortOrder};

/// One row of the goals dashboard: a category's target against what was
/// actually spent.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub goal: Decimal,
    pub realized: Decimal,
    /// `realized / goal * 100`, 0 when the goal is 0, rounded to 2 dp
    pub percentage: Decimal,
    /// `goal - realized`; negative means over budget
    pub balance: Decimal,
}

/// Group expenses by calendar day, most recent day first. Within a day the
/// input order is preserved.
pub fn group_by_day(expenses: &[ExpenseView]) -> Vec<(NaiveDate, Vec<ExpenseView>)> {
    let mut days: BTreeMap<NaiveDate, Vec<ExpenseView>> = BTreeMap::new();
    for expense in expenses {
        days.entry(expense.date).or_default().push(expense.clone());
    }
    days.into_iter().rev().collect()
}

/// Total of all amounts.
pub fn sum_amounts(expenses: &[ExpenseView]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Group expenses by subcategory name, ascending by name. Expenses whose
/// subcategory did not resolve to a name are excluded.
pub fn group_by_subcategory(expenses: &[ExpenseView]) -> Vec<(String, Vec<ExpenseView>)> {
    let mut groups: BTreeMap<String, Vec<ExpenseView>> = BTreeMap::new();
    for expense in expenses {
        let Some(name) = expense.subcategory.as_ref().filter(|n| !n.is_empty()) else {
            continue;
        };
        groups.entry(name.clone()).or_default().push(expense.clone());
    }
    groups.into_iter().collect()
}

/// Roll up realized spending against goals per category.
///
/// Categories present only in goals or only in expenses both appear; the
/// absent side defaults to zero. Expenses whose category did not resolve
/// are left out of the rollup.
pub fn category_rollup(goals: &[GoalView], expenses: &[ExpenseView]) -> Vec<CategoryRollup> {
    let mut realized: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        if let Some(ref category) = expense.category {
            *realized.entry(category.clone()).or_default() += expense.amount;
        }
    }

    let mut targets: BTreeMap<String, Decimal> = BTreeMap::new();
    for goal in goals {
        if let Some(ref category) = goal.category {
            *targets.entry(category.clone()).or_default() += goal.target;
        }
    }

    let mut categories: Vec<&String> = targets.keys().chain(realized.keys()).collect();
    categories.sort();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let goal = targets.get(category).copied().unwrap_or_default();
            let spent = realized.get(category).copied().unwrap_or_default();
            let percentage = if goal.is_zero() {
                Decimal::ZERO
            } else {
                (spent / goal * Decimal::ONE_HUNDRED).round_dp(2)
            };
            CategoryRollup {
                category: category.clone(),
                goal,
                realized: spent,
                percentage,
                balance: goal - spent,
            }
        })
        .collect()
}

/// Sort expenses in place. All comparators are total: missing strings sort
/// as the empty string. The underlying sort is stable.
pub fn sort_expenses(expenses: &mut [ExpenseView], order: SortOrder) {
    match order {
        SortOrder::DateDesc => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::DateAsc => expenses.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::ValueDesc => expenses.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortOrder::ValueAsc => expenses.sort_by(|a, b| a.amount.cmp(&b.amount)),
        SortOrder::NameAsc => expenses.sort_by(|a, b| {
            a.location
                .as_deref()
                .unwrap_or("")
                .cmp(b.location.as_deref().unwrap_or(""))
        }),
        SortOrder::NameDesc => expenses.sort_by(|a, b| {
            b.location
                .as_deref()
                .unwrap_or("")
                .cmp(a.location.as_deref().unwrap_or(""))
        }),
        SortOrder::CategoryAsc => expenses.sort_by(|a, b| {
            a.category
                .as_deref()
                .unwrap_or("")
                .cmp(b.category.as_deref().unwrap_or(""))
        }),
        SortOrder::CategoryDesc => expenses.sort_by(|a, b| {
            b.category
                .as_deref()
                .unwrap_or("")
                .cmp(a.category.as_deref().unwrap_or(""))
        }),
    }
}
