//! Expense command implementations

use anyhow::Result;
use chrono::NaiveDate;

use centavo_core::aggregate;
use centavo_core::models::{Expense, ExpenseStatus, SortOrder};
use centavo_core::store::{Store, StoreClient};

use super::{fetch_taxonomy, month_label, parse_amount};

pub async fn cmd_expenses_list(
    store: &StoreClient,
    year: i32,
    month: u32,
    sort: SortOrder,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let expenses = store.list_expenses_for_month(year, month).await?;

    if expenses.is_empty() {
        println!("No expenses in {}.", month_label(year, month));
        return Ok(());
    }

    let mut views: Vec<_> = expenses.iter().map(|e| taxonomy.expense_view(e)).collect();
    aggregate::sort_expenses(&mut views, sort);

    println!();
    println!("💸 Expenses {}", month_label(year, month));
    println!("   ─────────────────────────────────────────────────────────────");
    for view in &views {
        println!(
            "   {}  {}  R$ {:>9.2}  {:<16} {:<16} {}",
            view.id.as_deref().unwrap_or("-"),
            view.date,
            view.amount,
            view.category.as_deref().unwrap_or("-"),
            view.subcategory.as_deref().unwrap_or("-"),
            view.location.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("   Total: R$ {:.2}", aggregate::sum_amounts(&views));

    Ok(())
}

pub async fn cmd_expenses_show(store: &StoreClient, id: &str) -> Result<()> {
    let expense = store
        .get_expense(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Expense not found: {}", id))?;
    let taxonomy = fetch_taxonomy(store).await?;
    let view = taxonomy.expense_view(&expense);

    println!("Expense {}", id);
    println!("  amount:      R$ {:.2}", view.amount);
    println!("  date:        {} {}", view.date, view.time.as_deref().unwrap_or(""));
    println!(
        "  category:    {} / {}",
        view.category.as_deref().unwrap_or("-"),
        view.subcategory.as_deref().unwrap_or("-")
    );
    println!("  location:    {}", view.location.as_deref().unwrap_or("-"));
    println!("  detail:      {}", view.detail.as_deref().unwrap_or("-"));
    if let Some(card) = view.card.as_deref() {
        match view.card_last4 {
            Some(last4) => println!("  card:        {} final {}", card, last4),
            None => println!("  card:        {}", card),
        }
    }
    println!(
        "  status:      {}",
        view.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_expenses_add(
    store: &StoreClient,
    amount: &str,
    category: &str,
    subcategory: &str,
    date: Option<&str>,
    location: Option<&str>,
    detail: Option<&str>,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let subcategory_id = taxonomy
        .resolve_subcategory_id(category, subcategory)
        .ok_or_else(|| {
            anyhow::anyhow!("No subcategory '{}' under category '{}'", subcategory, category)
        })?
        .to_string();

    let date: NaiveDate = match date {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid date '{}' (use YYYY-MM-DD)", raw))?,
        None => chrono::Local::now().date_naive(),
    };

    let expense = Expense {
        id: None,
        amount: parse_amount(amount)?,
        date,
        subcategory_id,
        location: location.map(str::to_string),
        detail: detail.map(str::to_string),
        time: None,
        card: None,
        card_last4: None,
        status: Some(ExpenseStatus::Approved),
        due_date: None,
        created_at: None,
    };

    let stored = store.insert_expense(&expense).await?;
    println!(
        "✅ Added R$ {:.2} to {}/{} (id: {})",
        stored.amount,
        category,
        subcategory,
        stored.id.as_deref().unwrap_or("-")
    );

    Ok(())
}

pub async fn cmd_expenses_update(
    store: &StoreClient,
    id: &str,
    amount: Option<&str>,
    date: Option<&str>,
    location: Option<&str>,
    status: Option<&str>,
) -> Result<()> {
    let mut expense = store
        .get_expense(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Expense not found: {}", id))?;

    if let Some(raw) = amount {
        expense.amount = parse_amount(raw)?;
    }
    if let Some(raw) = date {
        expense.date = raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid date '{}' (use YYYY-MM-DD)", raw))?;
    }
    if let Some(raw) = location {
        expense.location = Some(raw.to_string());
    }
    if let Some(raw) = status {
        let parsed: ExpenseStatus = raw.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        expense.status = Some(parsed);
    }

    let updated = store.update_expense(&expense).await?;
    println!("✅ Updated expense {} (R$ {:.2})", id, updated.amount);

    Ok(())
}

pub async fn cmd_expenses_delete(store: &StoreClient, id: &str) -> Result<()> {
    store.delete_expense(id).await?;
    println!("✅ Deleted expense {}", id);
    Ok(())
}
