//! LLM backend command implementations

use anyhow::Result;

use centavo_core::llm::LlmBackend;

use super::{fetch_taxonomy, open_llm, open_store};

pub async fn cmd_llm_test(sms: Option<&str>, model: Option<&str>) -> Result<()> {
    let mut llm = open_llm()?;
    if let Some(model) = model {
        llm = llm.with_model(model);
    }

    println!("Backend: {} ({})", llm.model(), llm.host());
    if llm.health_check().await {
        println!("✅ Backend is reachable");
    } else {
        anyhow::bail!("Backend is not reachable");
    }

    let Some(sms) = sms else {
        return Ok(());
    };

    let store = open_store()?;
    let taxonomy = fetch_taxonomy(&store).await?;
    if taxonomy.is_empty() {
        anyhow::bail!("No taxonomy configured; the model has nothing to classify into");
    }

    let extracted = llm
        .extract_expense(sms, taxonomy.subcategories(), taxonomy.categories())
        .await?;

    println!();
    println!("Extraction:");
    println!("  amount:        R$ {:.2}", extracted.amount);
    println!(
        "  establishment: {}",
        extracted.establishment.as_deref().unwrap_or("-")
    );
    println!("  date:          {}", extracted.date.as_deref().unwrap_or("-"));
    println!("  time:          {}", extracted.time.as_deref().unwrap_or("-"));
    match taxonomy.subcategory_by_id(&extracted.subcategory_id) {
        Some(subcategory) => println!(
            "  subcategory:   {} ({})",
            subcategory.name, extracted.subcategory_id
        ),
        None => println!(
            "  subcategory:   ⚠️ unknown id {}",
            extracted.subcategory_id
        ),
    }

    Ok(())
}
