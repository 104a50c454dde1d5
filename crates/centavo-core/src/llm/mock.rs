//! Mock backend for testing
//!
//! Provides configurable extraction results without a network call. Tests can
//! pin an exact result with `with_response`, or lean on the default heuristic
//! that picks the first subcategory and scrapes the first decimal amount out
//! of the message.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{Category, Subcategory};

use super::types::ExtractedExpense;
use super::LlmBackend;

/// Mock LLM backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Canned extraction result, returned as-is when set
    response: Option<ExtractedExpense>,
    /// Artificial latency before answering, for timeout tests
    delay: Option<Duration>,
    /// Number of extract_expense calls, shared across clones
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            response: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return this extraction for every call
    pub fn with_response(response: ExtractedExpense) -> Self {
        Self {
            healthy: true,
            response: Some(response),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// How many times extract_expense was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn heuristic_amount(sms_text: &str) -> Option<Decimal> {
        // First decimal-looking token, e.g. "157,32" or "157.32"
        let re = Regex::new(r"(\d+)[.,](\d{2})\b").ok()?;
        let captures = re.captures(sms_text)?;
        let normalized = format!("{}.{}", &captures[1], &captures[2]);
        normalized.parse().ok()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn extract_expense(
        &self,
        sms_text: &str,
        subcategories: &[Subcategory],
        _categories: &[Category],
    ) -> Result<ExtractedExpense> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        let first = subcategories
            .first()
            .and_then(|s| s.id.clone())
            .ok_or_else(|| Error::Llm("mock backend has no subcategories to pick from".into()))?;
        let amount = Self::heuristic_amount(sms_text)
            .ok_or_else(|| Error::Llm(format!("mock backend found no amount in: {}", sms_text)))?;

        Ok(ExtractedExpense {
            establishment: None,
            amount,
            date: None,
            time: None,
            subcategory_id: first,
            card: None,
            card_last4: None,
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
