//! Centavo CLI - SMS-driven expense tracker
//!
//! Usage:
//!   centavo sms --sender 551140028922 "Compra aprovada R$ 157,32 ..."
//!   centavo dashboard --month 5 --year 2024
//!   centavo goals add Alimentação 800.00
//!   centavo settings set-sender 551140028922

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Sms { sender, body } => {
            commands::cmd_sms(cli.config.as_deref(), &sender, &body).await
        }
        Commands::Dashboard { month, year, sort } => {
            let store = commands::open_store()?;
            let (year, month) = commands::resolve_month(month, year)?;
            let sort = commands::parse_sort(&sort)?;
            commands::cmd_dashboard(&store, year, month, sort).await
        }
        Commands::Goals { action } => {
            let store = commands::open_store()?;
            match action {
                None => {
                    let (year, month) = commands::resolve_month(None, None)?;
                    commands::cmd_goals_list(&store, year, month).await
                }
                Some(GoalsAction::List { month, year }) => {
                    let (year, month) = commands::resolve_month(month, year)?;
                    commands::cmd_goals_list(&store, year, month).await
                }
                Some(GoalsAction::Add {
                    category,
                    amount,
                    month,
                    year,
                }) => {
                    let (year, month) = commands::resolve_month(month, year)?;
                    commands::cmd_goals_add(&store, &category, &amount, year, month).await
                }
                Some(GoalsAction::Update { id, amount }) => {
                    commands::cmd_goals_update(&store, &id, &amount).await
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&store, &id).await,
            }
        }
        Commands::Expenses { action } => {
            let store = commands::open_store()?;
            match action {
                None => {
                    let (year, month) = commands::resolve_month(None, None)?;
                    commands::cmd_expenses_list(&store, year, month, Default::default()).await
                }
                Some(ExpensesAction::List { month, year, sort }) => {
                    let (year, month) = commands::resolve_month(month, year)?;
                    let sort = commands::parse_sort(&sort)?;
                    commands::cmd_expenses_list(&store, year, month, sort).await
                }
                Some(ExpensesAction::Show { id }) => commands::cmd_expenses_show(&store, &id).await,
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    subcategory,
                    date,
                    location,
                    detail,
                }) => {
                    commands::cmd_expenses_add(
                        &store,
                        &amount,
                        &category,
                        &subcategory,
                        date.as_deref(),
                        location.as_deref(),
                        detail.as_deref(),
                    )
                    .await
                }
                Some(ExpensesAction::Update {
                    id,
                    amount,
                    date,
                    location,
                    status,
                }) => {
                    commands::cmd_expenses_update(
                        &store,
                        &id,
                        amount.as_deref(),
                        date.as_deref(),
                        location.as_deref(),
                        status.as_deref(),
                    )
                    .await
                }
                Some(ExpensesAction::Delete { id }) => {
                    commands::cmd_expenses_delete(&store, &id).await
                }
            }
        }
        Commands::Categories { action } => {
            let store = commands::open_store()?;
            match action {
                None | Some(CategoriesAction::List) => commands::cmd_categories_list(&store).await,
                Some(CategoriesAction::Add { name }) => {
                    commands::cmd_categories_add(&store, &name).await
                }
                Some(CategoriesAction::Rename { name, new_name }) => {
                    commands::cmd_categories_rename(&store, &name, &new_name).await
                }
                Some(CategoriesAction::Delete { name }) => {
                    commands::cmd_categories_delete(&store, &name).await
                }
            }
        }
        Commands::Subcategories { action } => {
            let store = commands::open_store()?;
            match action {
                None => commands::cmd_subcategories_list(&store, None).await,
                Some(SubcategoriesAction::List { category }) => {
                    commands::cmd_subcategories_list(&store, category.as_deref()).await
                }
                Some(SubcategoriesAction::Add { category, name }) => {
                    commands::cmd_subcategories_add(&store, &category, &name).await
                }
                Some(SubcategoriesAction::Rename {
                    category,
                    name,
                    new_name,
                }) => commands::cmd_subcategories_rename(&store, &category, &name, &new_name).await,
                Some(SubcategoriesAction::Delete { category, name }) => {
                    commands::cmd_subcategories_delete(&store, &category, &name).await
                }
            }
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::cmd_settings_show(cli.config.as_deref()),
            SettingsAction::SetSender { number } => {
                commands::cmd_settings_set_sender(cli.config.as_deref(), &number)
            }
            SettingsAction::ClearSender => {
                commands::cmd_settings_clear_sender(cli.config.as_deref())
            }
        },
        Commands::Llm { action } => match action {
            LlmAction::Test { sms, model } => {
                commands::cmd_llm_test(sms.as_deref(), model.as_deref()).await
            }
        },
    }
}
