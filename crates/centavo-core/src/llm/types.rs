//! Structured results returned by LLM backends

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expense fields extracted from a bank SMS notification.
///
/// The wire names match the storage schema so the model's JSON output maps
/// straight onto the expense row being built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedExpense {
    /// Establishment / merchant name, when the SMS carries one
    #[serde(rename = "estabelecimento", default)]
    pub establishment: Option<String>,

    /// Transaction amount
    #[serde(rename = "valor")]
    pub amount: Decimal,

    /// Transaction date as YYYY-MM-DD, when present in the SMS
    #[serde(rename = "data_competencia", default)]
    pub date: Option<String>,

    /// Transaction time as HH:MM, when present in the SMS
    #[serde(rename = "hora", default)]
    pub time: Option<String>,

    /// Id of the chosen subcategory, picked from the annotated list in the prompt
    #[serde(rename = "id_subcategoria")]
    pub subcategory_id: String,

    /// Card label the bank uses in the message, when present
    #[serde(rename = "cartao", default)]
    pub card: Option<String>,

    /// Last four digits of the card, when present
    #[serde(rename = "final_cartao", default)]
    pub card_last4: Option<i64>,
}
