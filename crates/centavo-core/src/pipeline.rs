//! SMS-to-expense pipeline
//!
//! Turns a bank notification into a stored expense row:
//!
//! 1. Sender filter (digit comparison against the configured sender)
//! 2. Taxonomy fetch (categories + subcategories)
//! 3. LLM extraction
//! 4. Subcategory validation against the taxonomy
//! 5. Insert
//!
//! Remote steps run under a bounded timeout so a stuck backend cannot hang
//! the batch. A message that fails one step never blocks the rest of the
//! batch.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::llm::{LlmBackend, LlmClient};
use crate::models::{Expense, ExpenseStatus};
use crate::store::{Store, StoreClient};
use crate::taxonomy::Taxonomy;
use crate::text::digits_only;

const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIME: &str = "00:00";

/// An incoming SMS notification.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    /// Sender as it arrived (may carry "+", spaces, punctuation)
    pub sender: String,
    /// Message body
    pub body: String,
}

/// What happened to one message.
#[derive(Debug, Clone)]
pub enum SmsOutcome {
    /// Extracted, validated and stored
    Saved(Expense),
    /// Sender did not match the configured number; nothing was extracted
    SenderMismatch,
    /// No categories or subcategories exist, so nothing can be classified
    NoTaxonomy,
    /// The model picked a subcategory id that is not in the taxonomy
    UnknownSubcategory(String),
}

/// Tally for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Messages stored as expenses
    pub saved: usize,
    /// Messages skipped without error (sender mismatch)
    pub ignored: usize,
    /// Messages that hit an error or failed validation
    pub failed: usize,
}

/// The end-to-end SMS processing pipeline.
#[derive(Clone)]
pub struct SmsPipeline {
    store: StoreClient,
    llm: LlmClient,
    /// Digits of the only accepted sender; None accepts everything
    allowed_sender: Option<String>,
    step_timeout: Duration,
}

impl SmsPipeline {
    pub fn new(store: StoreClient, llm: LlmClient, allowed_sender: Option<String>) -> Self {
        Self {
            store,
            llm,
            allowed_sender: allowed_sender
                .map(|s| digits_only(&s))
                .filter(|s| !s.is_empty()),
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Process one message end to end.
    pub async fn process_message(&self, message: &SmsMessage) -> Result<SmsOutcome> {
        if !self.sender_allowed(&message.sender) {
            debug!(sender = %message.sender, "sender does not match configured number, skipping");
            return Ok(SmsOutcome::SenderMismatch);
        }

        let taxonomy = self.fetch_taxonomy().await?;
        if taxonomy.is_empty() {
            warn!("no taxonomy configured, cannot classify message");
            return Ok(SmsOutcome::NoTaxonomy);
        }

        let extracted = self
            .bounded("llm extraction", async {
                self.llm
                    .extract_expense(
                        &message.body,
                        taxonomy.subcategories(),
                        taxonomy.categories(),
                    )
                    .await
            })
            .await?;

        if taxonomy.subcategory_by_id(&extracted.subcategory_id).is_none() {
            warn!(
                subcategory_id = %extracted.subcategory_id,
                "model picked a subcategory id that is not in the taxonomy"
            );
            return Ok(SmsOutcome::UnknownSubcategory(extracted.subcategory_id));
        }

        let expense = Expense {
            id: None,
            amount: extracted.amount,
            date: parse_date_or_today(extracted.date.as_deref()),
            subcategory_id: extracted.subcategory_id,
            location: extracted.establishment,
            detail: Some(message.body.clone()),
            time: Some(
                extracted
                    .time
                    .unwrap_or_else(|| DEFAULT_TIME.to_string()),
            ),
            card: extracted.card,
            card_last4: extracted.card_last4,
            status: Some(ExpenseStatus::Approved),
            due_date: None,
            created_at: None,
        };

        let stored = self
            .bounded("expense insert", self.store.insert_expense(&expense))
            .await?;
        debug!(
            id = stored.id.as_deref().unwrap_or("-"),
            amount = %stored.amount,
            "expense stored"
        );
        Ok(SmsOutcome::Saved(stored))
    }

    /// Process messages in arrival order. One bad message is counted and
    /// logged, never fatal for the batch.
    pub async fn process_batch(&self, messages: &[SmsMessage]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for message in messages {
            match self.process_message(message).await {
                Ok(SmsOutcome::Saved(_)) => summary.saved += 1,
                Ok(SmsOutcome::SenderMismatch) => summary.ignored += 1,
                Ok(SmsOutcome::NoTaxonomy) | Ok(SmsOutcome::UnknownSubcategory(_)) => {
                    summary.failed += 1
                }
                Err(e) => {
                    warn!(error = %e, sender = %message.sender, "message failed, continuing batch");
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    fn sender_allowed(&self, sender: &str) -> bool {
        match self.allowed_sender {
            Some(ref allowed) => digits_only(sender) == *allowed,
            None => true,
        }
    }

    async fn fetch_taxonomy(&self) -> Result<Taxonomy> {
        let categories = self
            .bounded("category fetch", self.store.list_categories())
            .await?;
        let subcategories = self
            .bounded("subcategory fetch", self.store.list_subcategories(None))
            .await?;
        Ok(Taxonomy::new(categories, subcategories))
    }

    async fn bounded<T>(
        &self,
        step: &str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.step_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(step, timeout = ?self.step_timeout, "pipeline step timed out");
                Err(Error::Timeout(self.step_timeout))
            }
        }
    }
}

fn parse_date_or_today(date: Option<&str>) -> NaiveDate {
    let today = Utc::now().date_naive();
    match date {
        Some(raw) => match raw.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(date = %raw, "unparseable date from model, using today");
                today
            }
        },
        None => today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date_or_today(Some("2024-05-03")),
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid_falls_back_to_today() {
        let today = Utc::now().date_naive();
        assert_eq!(parse_date_or_today(Some("03/05/2024")), today);
        assert_eq!(parse_date_or_today(None), today);
    }

    #[test]
    fn test_sender_normalized_at_construction() {
        let pipeline = SmsPipeline::new(
            StoreClient::memory(),
            LlmClient::mock(),
            Some("+55 (11) 4002-8922".to_string()),
        );
        assert!(pipeline.sender_allowed("551140028922"));
        assert!(pipeline.sender_allowed("55-11-4002-8922"));
        assert!(!pipeline.sender_allowed("551199999999"));
    }

    #[test]
    fn test_blank_sender_accepts_everything() {
        let pipeline = SmsPipeline::new(
            StoreClient::memory(),
            LlmClient::mock(),
            Some("  -- ".to_string()),
        );
        assert!(pipeline.sender_allowed("anything"));
    }
}
