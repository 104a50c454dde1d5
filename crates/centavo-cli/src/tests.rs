//! CLI command tests
//!
//! This module contains all tests for the CLI commands, run against the
//! in-memory store.

use clap::Parser;

use centavo_core::models::{Category, SortOrder, Subcategory};
use centavo_core::store::{MemoryStore, Store, StoreClient};

use crate::cli::{Cli, Commands, LlmAction};
use crate::commands;

fn seeded_client() -> StoreClient {
    let store = MemoryStore::new();
    let (categories, _) = store.seed_taxonomy(
        vec![Category {
            id: None,
            name: "Alimentação".to_string(),
        }],
        vec![],
    );
    let category_id = categories[0].id.clone().unwrap();
    store.seed_taxonomy(
        vec![],
        vec![Subcategory {
            id: None,
            category_id,
            name: "Supermercado".to_string(),
        }],
    );
    StoreClient::Memory(store)
}

// ========== Argument Parsing ==========

#[test]
fn test_parse_sms_command() {
    let cli = Cli::parse_from([
        "centavo",
        "sms",
        "--sender",
        "551140028922",
        "Compra aprovada R$ 10,00",
    ]);
    match cli.command {
        Commands::Sms { sender, body } => {
            assert_eq!(sender, "551140028922");
            assert_eq!(body, "Compra aprovada R$ 10,00");
        }
        _ => panic!("expected sms command"),
    }
}

#[test]
fn test_parse_dashboard_defaults() {
    let cli = Cli::parse_from(["centavo", "dashboard"]);
    match cli.command {
        Commands::Dashboard { month, year, sort } => {
            assert!(month.is_none());
            assert!(year.is_none());
            assert_eq!(sort, "date-desc");
        }
        _ => panic!("expected dashboard command"),
    }
}

#[test]
fn test_parse_llm_test_model_override() {
    let cli = Cli::parse_from(["centavo", "llm", "test", "--model", "gemini-1.5-pro"]);
    match cli.command {
        Commands::Llm {
            action: LlmAction::Test { sms, model },
        } => {
            assert!(sms.is_none());
            assert_eq!(model.as_deref(), Some("gemini-1.5-pro"));
        }
        _ => panic!("expected llm test command"),
    }
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::parse_from(["centavo", "--verbose", "--config", "/tmp/s.json", "dashboard"]);
    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str().unwrap(), "/tmp/s.json");
}

// ========== Helpers ==========

#[test]
fn test_parse_amount_accepts_comma() {
    assert_eq!(
        commands::parse_amount("42,90").unwrap(),
        commands::parse_amount("42.90").unwrap()
    );
    assert!(commands::parse_amount("abc").is_err());
}

#[test]
fn test_resolve_month_validates_range() {
    assert_eq!(
        commands::resolve_month(Some(5), Some(2024)).unwrap(),
        (2024, 5)
    );
    assert!(commands::resolve_month(Some(13), Some(2024)).is_err());
}

#[test]
fn test_parse_sort() {
    assert_eq!(
        commands::parse_sort("value-desc").unwrap(),
        SortOrder::ValueDesc
    );
    assert!(commands::parse_sort("bogus").is_err());
}

// ========== Taxonomy Commands ==========

#[tokio::test]
async fn test_cmd_categories_add_and_list() {
    let store = seeded_client();
    commands::cmd_categories_add(&store, "Transporte")
        .await
        .unwrap();
    assert_eq!(store.list_categories().await.unwrap().len(), 2);
    commands::cmd_categories_list(&store).await.unwrap();
}

#[tokio::test]
async fn test_cmd_categories_add_duplicate_fails() {
    let store = seeded_client();
    // Accent-insensitive match: "alimentacao" is the same category
    let result = commands::cmd_categories_add(&store, "alimentacao").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_categories_delete_with_children_fails() {
    let store = seeded_client();
    let result = commands::cmd_categories_delete(&store, "Alimentação").await;
    assert!(result.is_err());

    commands::cmd_subcategories_delete(&store, "Alimentação", "Supermercado")
        .await
        .unwrap();
    commands::cmd_categories_delete(&store, "Alimentação")
        .await
        .unwrap();
    assert!(store.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cmd_subcategories_rename() {
    let store = seeded_client();
    commands::cmd_subcategories_rename(&store, "Alimentação", "Supermercado", "Feira")
        .await
        .unwrap();
    let names: Vec<String> = store
        .list_subcategories(None)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Feira"]);
}

// ========== Expense Commands ==========

#[tokio::test]
async fn test_cmd_expenses_add_update_delete() {
    let store = seeded_client();
    commands::cmd_expenses_add(
        &store,
        "42,90",
        "Alimentação",
        "Supermercado",
        Some("2024-05-03"),
        Some("Mercado da esquina"),
        None,
    )
    .await
    .unwrap();

    let rows = store.list_expenses().await.unwrap();
    assert_eq!(rows.len(), 1);
    let id = rows[0].id.clone().unwrap();
    assert_eq!(rows[0].amount.to_string(), "42.90");

    commands::cmd_expenses_update(&store, &id, Some("50.00"), None, None, Some("pending"))
        .await
        .unwrap();
    let updated = store.get_expense(&id).await.unwrap().unwrap();
    assert_eq!(updated.amount.to_string(), "50.00");

    commands::cmd_expenses_delete(&store, &id).await.unwrap();
    assert!(store.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cmd_expenses_add_unknown_subcategory_fails() {
    let store = seeded_client();
    let result = commands::cmd_expenses_add(
        &store,
        "10.00",
        "Alimentação",
        "Restaurante",
        None,
        None,
        None,
    )
    .await;
    assert!(result.is_err());
}

// ========== Goal Commands ==========

#[tokio::test]
async fn test_cmd_goals_add_update_delete() {
    let store = seeded_client();
    commands::cmd_goals_add(&store, "Alimentação", "800.00", 2024, 5)
        .await
        .unwrap();

    let goals = store.list_goals_for_month(2024, 5).await.unwrap();
    assert_eq!(goals.len(), 1);
    let id = goals[0].id.clone().unwrap();
    assert_eq!(goals[0].start_date.unwrap().to_string(), "2024-05-01");

    commands::cmd_goals_update(&store, &id, "900.00")
        .await
        .unwrap();
    let goals = store.list_goals().await.unwrap();
    assert_eq!(goals[0].target.to_string(), "900.00");

    commands::cmd_goals_delete(&store, &id).await.unwrap();
    assert!(store.list_goals().await.unwrap().is_empty());
}

// ========== Settings Commands ==========

#[test]
fn test_cmd_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    commands::cmd_settings_set_sender(Some(&path), "+55 11 4002-8922").unwrap();
    let settings = centavo_core::Settings::load(&path).unwrap();
    assert_eq!(settings.sms_sender_number.as_deref(), Some("551140028922"));

    commands::cmd_settings_clear_sender(Some(&path)).unwrap();
    let settings = centavo_core::Settings::load(&path).unwrap();
    assert!(settings.sms_sender_number.is_none());

    commands::cmd_settings_show(Some(&path)).unwrap();
}
