//! SMS pipeline command

use std::path::Path;

use anyhow::Result;

use centavo_core::pipeline::{SmsMessage, SmsOutcome, SmsPipeline};
use centavo_core::Settings;

use super::{open_llm, open_store, settings_path};

pub async fn cmd_sms(config: Option<&Path>, sender: &str, body: &str) -> Result<()> {
    let store = open_store()?;
    let llm = open_llm()?;
    let settings = Settings::load(&settings_path(config)?)?;

    let pipeline = SmsPipeline::new(store, llm, settings.sms_sender_number);
    let message = SmsMessage {
        sender: sender.to_string(),
        body: body.to_string(),
    };
    tracing::debug!(sender, "processing message");

    match pipeline.process_message(&message).await? {
        SmsOutcome::Saved(expense) => {
            println!(
                "✅ Saved R$ {:.2} on {} ({})",
                expense.amount,
                expense.date,
                expense.location.as_deref().unwrap_or("-")
            );
            if let Some(id) = expense.id {
                println!("   id: {}", id);
            }
        }
        SmsOutcome::SenderMismatch => {
            println!("⏭️  Ignored: sender does not match the configured number");
            println!("   Use 'centavo settings set-sender' to change it.");
        }
        SmsOutcome::NoTaxonomy => {
            anyhow::bail!(
                "No categories or subcategories exist yet. \
                 Create some with 'centavo categories add' first."
            );
        }
        SmsOutcome::UnknownSubcategory(id) => {
            anyhow::bail!("Model picked unknown subcategory id '{}'; nothing saved", id);
        }
    }

    Ok(())
}
