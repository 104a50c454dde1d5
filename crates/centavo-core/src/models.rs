//! Domain models for centavo
//!
//! Wire names follow the remote schema, which is in Portuguese
//! (`despesas`, `categoria`, `subcategoria`, `metas`). The canonical shape
//! is relational: rows carry ids, display names are joined at read time
//! into the view structs at the bottom of this module.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One financial transaction, as persisted in the `despesas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned id, absent before first persistence
    #[serde(rename = "id_despesa", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Non-negative currency amount, 2 decimal places
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "data_despesa")]
    pub date: NaiveDate,
    #[serde(rename = "id_subcategoria")]
    pub subcategory_id: String,
    /// Merchant / establishment free text
    #[serde(rename = "local", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "detalhe", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Time of day, `HH:MM`
    #[serde(rename = "hora", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Card label as printed in the SMS
    #[serde(rename = "cartao", skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(rename = "final_cartao", skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<i64>,
    #[serde(rename = "status_transacao", skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpenseStatus>,
    #[serde(rename = "vencimento", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Expense {
    /// Month number (1-12), derived from the transaction date.
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Approved,
    Pending,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ExpenseStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown expense status: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A top-level spending classification, `categoria` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nome_categoria")]
    pub name: String,
}

/// Belongs to exactly one category, `subcategoria` table. An expense's
/// authoritative classification is its subcategory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "id_subcategoria", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "id_categoria")]
    pub category_id: String,
    #[serde(rename = "nome_subcategoria")]
    pub name: String,
}

/// Per-category target spending for a period, `metas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    #[serde(rename = "id_meta", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "id_categoria")]
    pub category_id: String,
    /// Non-negative target amount
    #[serde(rename = "valor_meta")]
    pub target: Decimal,
    #[serde(rename = "periodo", skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(rename = "data_inicio", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// An expense with its display names joined in. Never persisted; produced
/// by [`crate::taxonomy::Taxonomy::expense_view`] and consumed by the
/// aggregation engine and the CLI screens.
#[derive(Debug, Clone)]
pub struct ExpenseView {
    pub id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub detail: Option<String>,
    pub time: Option<String>,
    pub card: Option<String>,
    pub card_last4: Option<i64>,
    pub status: Option<ExpenseStatus>,
    pub month: u32,
    /// Name of the owning category, when the subcategory id resolves
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// A goal with its category name joined in.
#[derive(Debug, Clone)]
pub struct GoalView {
    pub id: Option<String>,
    pub target: Decimal,
    pub period: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Display sort orders for expense lists. Date descending is the default
/// everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    ValueDesc,
    ValueAsc,
    NameAsc,
    NameDesc,
    CategoryAsc,
    CategoryDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::ValueDesc => "value-desc",
            Self::ValueAsc => "value-asc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::CategoryAsc => "category-asc",
            Self::CategoryDesc => "category-desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date-desc" | "date" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "value-desc" | "value" => Ok(Self::ValueDesc),
            "value-asc" => Ok(Self::ValueAsc),
            "name-asc" | "name" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "category-asc" | "category" => Ok(Self::CategoryAsc),
            "category-desc" => Ok(Self::CategoryDesc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_month_derived_from_date() {
        let expense = Expense {
            id: None,
            amount: Decimal::new(15732, 2),
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            subcategory_id: "sub-1".to_string(),
            location: None,
            detail: None,
            time: None,
            card: None,
            card_last4: None,
            status: None,
            due_date: None,
            created_at: None,
        };
        assert_eq!(expense.month(), 5);
    }

    #[test]
    fn test_expense_wire_names() {
        let expense = Expense {
            id: Some("abc".to_string()),
            amount: Decimal::new(1050, 2),
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            subcategory_id: "sub-1".to_string(),
            location: Some("Padaria".to_string()),
            detail: None,
            time: Some("08:15".to_string()),
            card: None,
            card_last4: Some(4242),
            status: Some(ExpenseStatus::Approved),
            due_date: None,
            created_at: None,
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["id_despesa"], "abc");
        assert_eq!(json["data_despesa"], "2024-05-03");
        assert_eq!(json["id_subcategoria"], "sub-1");
        assert_eq!(json["local"], "Padaria");
        assert_eq!(json["final_cartao"], 4242);
        assert_eq!(json["status_transacao"], "approved");
        // Absent optionals must not be serialized at all
        assert!(json.get("detalhe").is_none());
    }

    #[test]
    fn test_expense_deserializes_numeric_amount() {
        let expense: Expense = serde_json::from_str(
            r#"{"valor": 157.32, "data_despesa": "2024-05-03", "id_subcategoria": "s1"}"#,
        )
        .unwrap();
        assert_eq!(expense.amount, Decimal::new(15732, 2));
    }

    #[test]
    fn test_sort_order_round_trip() {
        for order in [
            SortOrder::DateDesc,
            SortOrder::ValueAsc,
            SortOrder::NameDesc,
            SortOrder::CategoryAsc,
        ] {
            assert_eq!(order.as_str().parse::<SortOrder>().unwrap(), order);
        }
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
