//! Goal command implementations

use anyhow::Result;
use chrono::NaiveDate;

use centavo_core::aggregate;
use centavo_core::models::Goal;
use centavo_core::store::{Store, StoreClient};

use super::{fetch_taxonomy, month_label, parse_amount};

pub async fn cmd_goals_list(store: &StoreClient, year: i32, month: u32) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let goals = store.list_goals_for_month(year, month).await?;
    let expenses = store.list_expenses_for_month(year, month).await?;

    if goals.is_empty() {
        println!("No goals in {}.", month_label(year, month));
        return Ok(());
    }

    let goal_views: Vec<_> = goals.iter().map(|g| taxonomy.goal_view(g)).collect();
    let expense_views: Vec<_> = expenses.iter().map(|e| taxonomy.expense_view(e)).collect();

    println!();
    println!("🎯 Goals {}", month_label(year, month));
    println!("   ─────────────────────────────────────────────────────────────");
    for rollup in aggregate::category_rollup(&goal_views, &expense_views) {
        let marker = if rollup.balance.is_sign_negative() {
            "⚠️"
        } else {
            "  "
        };
        println!(
            "   {} {:<20} spent R$ {:>9.2} of R$ {:>9.2}  {}%  (left R$ {:.2})",
            marker, rollup.category, rollup.realized, rollup.goal, rollup.percentage, rollup.balance
        );
    }

    Ok(())
}

pub async fn cmd_goals_add(
    store: &StoreClient,
    category: &str,
    amount: &str,
    year: i32,
    month: u32,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let category_row = taxonomy
        .resolve_category(category)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category))?;
    let category_id = category_row
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Category '{}' has no id", category))?;

    let start_date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid month {}-{}", year, month))?;

    let goal = Goal {
        id: None,
        category_id,
        target: parse_amount(amount)?,
        period: Some("mensal".to_string()),
        start_date: Some(start_date),
    };

    let stored = store.create_goal(&goal).await?;
    println!(
        "✅ Goal for '{}' in {}: R$ {:.2} (id: {})",
        category,
        month_label(year, month),
        stored.target,
        stored.id.as_deref().unwrap_or("-")
    );

    Ok(())
}

pub async fn cmd_goals_update(store: &StoreClient, id: &str, amount: &str) -> Result<()> {
    let goals = store.list_goals().await?;
    let mut goal = goals
        .into_iter()
        .find(|g| g.id.as_deref() == Some(id))
        .ok_or_else(|| anyhow::anyhow!("Goal not found: {}", id))?;

    goal.target = parse_amount(amount)?;
    let updated = store.update_goal(&goal).await?;
    println!("✅ Goal {} set to R$ {:.2}", id, updated.target);

    Ok(())
}

pub async fn cmd_goals_delete(store: &StoreClient, id: &str) -> Result<()> {
    store.delete_goal(id).await?;
    println!("✅ Deleted goal {}", id);
    Ok(())
}
