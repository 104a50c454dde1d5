//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `dashboard` - Monthly dashboard (totals, day groups, goal rollups)
//! - `expenses` - Expense commands (list, show, add, update, delete)
//! - `goals` - Goal commands (list, add, update, delete)
//! - `llm` - LLM backend commands (test)
//! - `settings` - Settings commands (show, set/clear sender)
//! - `sms` - SMS pipeline command
//! - `taxonomy` - Category and subcategory commands

pub mod dashboard;
pub mod expenses;
pub mod goals;
pub mod llm;
pub mod settings;
pub mod sms;
pub mod taxonomy;

// Re-export command functions for main.rs
pub use dashboard::*;
pub use expenses::*;
pub use goals::*;
pub use llm::*;
pub use settings::*;
pub use sms::*;
pub use taxonomy::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_decimal::Decimal;

use centavo_core::models::SortOrder;
use centavo_core::store::{Store, StoreClient};
use centavo_core::taxonomy::Taxonomy;
use centavo_core::LlmClient;

/// Open the remote store from SUPABASE_URL / SUPABASE_KEY
pub fn open_store() -> Result<StoreClient> {
    StoreClient::from_env().context("SUPABASE_URL and SUPABASE_KEY must be set")
}

/// Open the LLM backend from LLM_BACKEND and its backend-specific vars
pub fn open_llm() -> Result<LlmClient> {
    LlmClient::from_env().context(
        "No LLM backend configured. Set GEMINI_API_KEY (or LLM_BACKEND=openai_compatible \
         with OPENAI_COMPATIBLE_HOST)",
    )
}

/// Settings file location: --config wins, then the platform data dir
pub fn settings_path(config: Option<&Path>) -> Result<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(centavo_core::settings::default_path()?),
    }
}

/// Fetch the full taxonomy in one shot
pub async fn fetch_taxonomy(store: &StoreClient) -> Result<Taxonomy> {
    let categories = store.list_categories().await?;
    let subcategories = store.list_subcategories(None).await?;
    Ok(Taxonomy::new(categories, subcategories))
}

/// Resolve month/year arguments, defaulting to the current month
pub fn resolve_month(month: Option<u32>, year: Option<i32>) -> Result<(i32, u32)> {
    let today = chrono::Local::now().date_naive();
    let month = month.unwrap_or_else(|| today.month());
    let year = year.unwrap_or_else(|| today.year());
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12, got {}", month);
    }
    Ok((year, month))
}

/// Parse an amount, accepting both "42.90" and "42,90"
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse()
        .with_context(|| format!("Invalid amount: {}", raw))
}

/// Parse a sort order argument
pub fn parse_sort(raw: &str) -> Result<SortOrder> {
    raw.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Month label like "2024-05"
pub fn month_label(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}
