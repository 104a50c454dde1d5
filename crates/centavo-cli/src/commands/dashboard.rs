//! Monthly dashboard command

use anyhow::Result;

use centavo_core::aggregate;
use centavo_core::models::SortOrder;
use centavo_core::store::{Store, StoreClient};

use super::{fetch_taxonomy, month_label};

pub async fn cmd_dashboard(
    store: &StoreClient,
    year: i32,
    month: u32,
    sort: SortOrder,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let expenses = store.list_expenses_for_month(year, month).await?;
    let goals = store.list_goals_for_month(year, month).await?;

    let mut views: Vec<_> = expenses.iter().map(|e| taxonomy.expense_view(e)).collect();
    aggregate::sort_expenses(&mut views, sort);
    let goal_views: Vec<_> = goals.iter().map(|g| taxonomy.goal_view(g)).collect();

    println!();
    println!("📊 Dashboard {}", month_label(year, month));
    println!("   ─────────────────────────────────────────────────────────────");

    if views.is_empty() {
        println!("   No expenses this month.");
    } else {
        let total = aggregate::sum_amounts(&views);
        println!("   Total: R$ {:.2} ({} expenses)", total, views.len());
        println!();

        for (day, day_expenses) in aggregate::group_by_day(&views) {
            let day_total = aggregate::sum_amounts(&day_expenses);
            println!("   {} — R$ {:.2}", day, day_total);
            for expense in &day_expenses {
                println!(
                    "     • R$ {:>9.2}  {:<20} {}",
                    expense.amount,
                    expense.subcategory.as_deref().unwrap_or("-"),
                    expense.location.as_deref().unwrap_or("")
                );
            }
        }

        println!();
        println!("   By subcategory:");
        for (name, group) in aggregate::group_by_subcategory(&views) {
            println!(
                "     {:<24} R$ {:>9.2}",
                name,
                aggregate::sum_amounts(&group)
            );
        }
    }

    let rollups = aggregate::category_rollup(&goal_views, &views);
    if !rollups.is_empty() {
        println!();
        println!("   Goals:");
        for rollup in rollups {
            let marker = if rollup.balance.is_sign_negative() {
                "⚠️"
            } else {
                "  "
            };
            println!(
                "     {} {:<20} R$ {:>9.2} of R$ {:>9.2}  ({}%)",
                marker, rollup.category, rollup.realized, rollup.goal, rollup.percentage
            );
        }
    }

    Ok(())
}
