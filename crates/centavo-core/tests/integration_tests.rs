//! Integration tests for centavo-core
//!
//! These tests exercise the full SMS → extraction → validation → store
//! workflow against the in-memory store and the mock LLM backend.

use std::time::Duration;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use centavo_core::{
    llm::{ExtractedExpense, MockBackend},
    models::{Category, ExpenseStatus, SortOrder, Subcategory},
    pipeline::{BatchSummary, SmsMessage, SmsOutcome, SmsPipeline},
    store::{MemoryStore, Store, StoreClient},
    taxonomy::Taxonomy,
    Error, LlmClient,
};

/// Seed the usual two-category taxonomy and return (store, subcategory ids).
///
/// Alimentação gets Restaurante and Supermercado, Transporte gets
/// Combustível, matching a typical starter setup.
fn seeded_store() -> (MemoryStore, Vec<Subcategory>) {
    let store = MemoryStore::new();
    let (categories, _) = store.seed_taxonomy(
        vec![
            Category {
                id: None,
                name: "Alimentação".to_string(),
            },
            Category {
                id: None,
                name: "Transporte".to_string(),
            },
        ],
        vec![],
    );
    let food_id = categories[0].id.clone().unwrap();
    let transport_id = categories[1].id.clone().unwrap();
    let (_, subcategories) = store.seed_taxonomy(
        vec![],
        vec![
            Subcategory {
                id: None,
                category_id: food_id.clone(),
                name: "Restaurante".to_string(),
            },
            Subcategory {
                id: None,
                category_id: food_id,
                name: "Supermercado".to_string(),
            },
            Subcategory {
                id: None,
                category_id: transport_id,
                name: "Combustível".to_string(),
            },
        ],
    );
    (store, subcategories)
}

fn message(sender: &str, body: &str) -> SmsMessage {
    SmsMessage {
        sender: sender.to_string(),
        body: body.to_string(),
    }
}

// =============================================================================
// End-to-end pipeline
// =============================================================================

#[tokio::test]
async fn test_full_sms_workflow() {
    let (store, subcategories) = seeded_store();
    let supermercado = subcategories
        .iter()
        .find(|s| s.name == "Supermercado")
        .unwrap();

    let extracted = ExtractedExpense {
        establishment: Some("PAO DE ACUCAR".to_string()),
        amount: Decimal::new(15732, 2),
        date: Some("2024-05-03".to_string()),
        time: Some("19:42".to_string()),
        subcategory_id: supermercado.id.clone().unwrap(),
        card: Some("Visa".to_string()),
        card_last4: Some(4821),
    };
    let mock = MockBackend::with_response(extracted);
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::Mock(mock),
        Some("551140028922".to_string()),
    );

    let outcome = pipeline
        .process_message(&message(
            "+55 11 4002-8922",
            "Compra aprovada R$ 157,32 em PAO DE ACUCAR 03/05 19:42 Visa final 4821",
        ))
        .await
        .unwrap();

    let saved = match outcome {
        SmsOutcome::Saved(expense) => expense,
        other => panic!("expected Saved, got {:?}", other),
    };
    assert!(saved.id.is_some());
    assert_eq!(saved.amount, Decimal::new(15732, 2));
    assert_eq!(saved.date.month(), 5);
    assert_eq!(saved.status, Some(ExpenseStatus::Approved));
    assert_eq!(saved.location.as_deref(), Some("PAO DE ACUCAR"));
    assert_eq!(saved.time.as_deref(), Some("19:42"));

    // The row landed in the month listing
    let may = store.list_expenses_for_month(2024, 5).await.unwrap();
    assert_eq!(may.len(), 1);

    // The read-time view resolves display names
    let categories = store.list_categories().await.unwrap();
    let subcategories = store.list_subcategories(None).await.unwrap();
    let taxonomy = Taxonomy::new(categories, subcategories);
    let view = taxonomy.expense_view(&may[0]);
    assert_eq!(view.category.as_deref(), Some("Alimentação"));
    assert_eq!(view.subcategory.as_deref(), Some("Supermercado"));
    assert_eq!(view.month, 5);
}

#[tokio::test]
async fn test_sender_mismatch_never_calls_the_model() {
    let (store, _) = seeded_store();
    let mock = MockBackend::new();
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::Mock(mock.clone()),
        Some("551140028922".to_string()),
    );

    let outcome = pipeline
        .process_message(&message("551199999999", "Compra aprovada R$ 50,00"))
        .await
        .unwrap();

    assert!(matches!(outcome, SmsOutcome::SenderMismatch));
    assert_eq!(mock.calls(), 0);
    assert!(store.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_configured_sender_accepts_any() {
    let (store, _) = seeded_store();
    let pipeline = SmsPipeline::new(StoreClient::Memory(store), LlmClient::mock(), None);

    let outcome = pipeline
        .process_message(&message("whoever", "Compra aprovada R$ 12,00"))
        .await
        .unwrap();
    assert!(matches!(outcome, SmsOutcome::Saved(_)));
}

#[tokio::test]
async fn test_empty_taxonomy_stops_before_extraction() {
    let store = MemoryStore::new();
    let mock = MockBackend::new();
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store),
        LlmClient::Mock(mock.clone()),
        None,
    );

    let outcome = pipeline
        .process_message(&message("x", "Compra aprovada R$ 50,00"))
        .await
        .unwrap();
    assert!(matches!(outcome, SmsOutcome::NoTaxonomy));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_unknown_subcategory_is_rejected() {
    let (store, _) = seeded_store();
    let extracted = ExtractedExpense {
        establishment: None,
        amount: Decimal::new(1000, 2),
        date: None,
        time: None,
        subcategory_id: "sub-999".to_string(),
        card: None,
        card_last4: None,
    };
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::Mock(MockBackend::with_response(extracted)),
        None,
    );

    let outcome = pipeline
        .process_message(&message("x", "Compra aprovada R$ 10,00"))
        .await
        .unwrap();
    match outcome {
        SmsOutcome::UnknownSubcategory(id) => assert_eq!(id, "sub-999"),
        other => panic!("expected UnknownSubcategory, got {:?}", other),
    }
    assert!(store.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_date_and_time_default() {
    let (store, subcategories) = seeded_store();
    let extracted = ExtractedExpense {
        establishment: None,
        amount: Decimal::new(2500, 2),
        date: None,
        time: None,
        subcategory_id: subcategories[0].id.clone().unwrap(),
        card: None,
        card_last4: None,
    };
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store),
        LlmClient::Mock(MockBackend::with_response(extracted)),
        None,
    );

    let outcome = pipeline
        .process_message(&message("x", "Compra aprovada"))
        .await
        .unwrap();
    let saved = match outcome {
        SmsOutcome::Saved(expense) => expense,
        other => panic!("expected Saved, got {:?}", other),
    };
    assert_eq!(saved.date, Utc::now().date_naive());
    assert_eq!(saved.time.as_deref(), Some("00:00"));
}

// =============================================================================
// Batch processing
// =============================================================================

#[tokio::test]
async fn test_batch_counts_saved_ignored_failed() {
    let (store, _) = seeded_store();
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::mock(),
        Some("551140028922".to_string()),
    );

    let messages = vec![
        // saved: matching sender, amount present
        message("551140028922", "Compra aprovada R$ 30,00 em PADARIA"),
        // ignored: wrong sender
        message("551177777777", "Compra aprovada R$ 99,00"),
        // failed: no amount for the heuristic extractor
        message("55 11 4002-8922", "Seu saldo foi atualizado"),
        // saved: matching sender with punctuation
        message("+55 (11) 4002-8922", "Compra aprovada R$ 45,90 em POSTO"),
    ];

    let summary = pipeline.process_batch(&messages).await;
    assert_eq!(
        summary,
        BatchSummary {
            saved: 2,
            ignored: 1,
            failed: 1,
        }
    );
    assert_eq!(store.list_expenses().await.unwrap().len(), 2);
}

// =============================================================================
// Step timeouts
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_model_times_out() {
    let (store, _) = seeded_store();
    let mock = MockBackend::new().with_delay(Duration::from_secs(60));
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::Mock(mock),
        None,
    )
    .with_step_timeout(Duration::from_millis(50));

    let err = pipeline
        .process_message(&message("12345", "Compra aprovada R$ 50,00"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
    assert!(store.list_expenses().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_batch_counts_timed_out_message_as_failed() {
    let (store, _) = seeded_store();
    let mock = MockBackend::new().with_delay(Duration::from_secs(60));
    let pipeline = SmsPipeline::new(
        StoreClient::Memory(store.clone()),
        LlmClient::Mock(mock),
        None,
    )
    .with_step_timeout(Duration::from_millis(50));

    let summary = pipeline
        .process_batch(&[message("12345", "Compra aprovada R$ 50,00")])
        .await;
    assert_eq!(
        summary,
        BatchSummary {
            saved: 0,
            ignored: 0,
            failed: 1,
        }
    );
    assert!(store.list_expenses().await.unwrap().is_empty());
}

// =============================================================================
// Aggregation over stored rows
// =============================================================================

#[tokio::test]
async fn test_month_dashboard_from_stored_rows() {
    let (store, subcategories) = seeded_store();
    let restaurante = subcategories
        .iter()
        .find(|s| s.name == "Restaurante")
        .unwrap()
        .id
        .clone()
        .unwrap();
    let combustivel = subcategories
        .iter()
        .find(|s| s.name == "Combustível")
        .unwrap()
        .id
        .clone()
        .unwrap();

    for (date, amount, subcategory_id) in [
        ("2024-05-03", 5000i64, restaurante.clone()),
        ("2024-05-03", 2550, combustivel.clone()),
        ("2024-05-10", 12000, restaurante.clone()),
        ("2024-06-01", 999, restaurante),
    ] {
        store
            .insert_expense(&centavo_core::Expense {
                id: None,
                amount: Decimal::new(amount, 2),
                date: date.parse().unwrap(),
                subcategory_id,
                location: None,
                detail: None,
                time: None,
                card: None,
                card_last4: None,
                status: Some(ExpenseStatus::Approved),
                due_date: None,
                created_at: None,
            })
            .await
            .unwrap();
    }

    let rows = store.list_expenses_for_month(2024, 5).await.unwrap();
    assert_eq!(rows.len(), 3);

    let taxonomy = Taxonomy::new(
        store.list_categories().await.unwrap(),
        store.list_subcategories(None).await.unwrap(),
    );
    let mut views: Vec<_> = rows.iter().map(|e| taxonomy.expense_view(e)).collect();
    centavo_core::aggregate::sort_expenses(&mut views, SortOrder::DateDesc);

    let total = centavo_core::aggregate::sum_amounts(&views);
    assert_eq!(total, Decimal::new(19550, 2));

    let days = centavo_core::aggregate::group_by_day(&views);
    assert_eq!(days.len(), 2);
    // Most recent day first
    assert_eq!(days[0].0.to_string(), "2024-05-10");
    assert_eq!(days[1].1.len(), 2);

    let by_subcategory = centavo_core::aggregate::group_by_subcategory(&views);
    let names: Vec<&str> = by_subcategory.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Combustível", "Restaurante"]);
}
