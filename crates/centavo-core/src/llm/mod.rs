//! Pluggable LLM backend abstraction
//!
//! Backend-agnostic interface for turning a bank SMS into structured
//! expense fields.
//!
//! # Architecture
//!
//! - `LlmBackend` trait: defines the extraction interface
//! - `LlmClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `LLM_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod gemini;
mod mock;
mod openai_compat;
pub mod parsing;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compat::OpenAICompatibleBackend;
pub use types::ExtractedExpense;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, Subcategory};

/// Trait defining the interface for all LLM backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Extract structured expense fields from a bank SMS.
    ///
    /// The backend must pick `id_subcategoria` from the given list; the
    /// caller validates the choice against the taxonomy afterwards.
    async fn extract_expense(
        &self,
        sms_text: &str,
        subcategories: &[Subcategory],
        categories: &[Category],
    ) -> Result<ExtractedExpense>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete LLM client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LlmClient {
    /// Google Generative Language API
    Gemini(GeminiBackend),
    /// Any server implementing the OpenAI chat completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl LlmClient {
    /// Create an LLM client from environment variables
    ///
    /// Checks `LLM_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY and GEMINI_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("LLM_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(LlmClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(LlmClient::OpenAICompatible)
            }
            "mock" => Some(LlmClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown LLM_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(LlmClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        LlmClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            LlmClient::Gemini(b) => LlmClient::Gemini(b.with_model(model)),
            LlmClient::OpenAICompatible(b) => LlmClient::OpenAICompatible(b.with_model(model)),
            LlmClient::Mock(b) => LlmClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn extract_expense(
        &self,
        sms_text: &str,
        subcategories: &[Subcategory],
        categories: &[Category],
    ) -> Result<ExtractedExpense> {
        match self {
            LlmClient::Gemini(b) => b.extract_expense(sms_text, subcategories, categories).await,
            LlmClient::OpenAICompatible(b) => {
                b.extract_expense(sms_text, subcategories, categories).await
            }
            LlmClient::Mock(b) => b.extract_expense(sms_text, subcategories, categories).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LlmClient::Gemini(b) => b.health_check().await,
            LlmClient::OpenAICompatible(b) => b.health_check().await,
            LlmClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmClient::Gemini(b) => b.model(),
            LlmClient::OpenAICompatible(b) => b.model(),
            LlmClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            LlmClient::Gemini(b) => b.host(),
            LlmClient::OpenAICompatible(b) => b.host(),
            LlmClient::Mock(b) => b.host(),
        }
    }
}

/// Render the subcategory list the prompt presents to the model.
///
/// One line per subcategory, annotated with its parent category name so the
/// model can use purchase context:
/// `- sub-7: Supermercado (categoria: Alimentação)`
pub(crate) fn annotate_subcategories(
    subcategories: &[Subcategory],
    categories: &[Category],
) -> String {
    let mut lines = Vec::with_capacity(subcategories.len());
    for subcategory in subcategories {
        let Some(ref id) = subcategory.id else {
            continue;
        };
        let parent = categories
            .iter()
            .find(|c| c.id.as_deref() == Some(subcategory.category_id.as_str()))
            .map(|c| c.name.as_str());
        match parent {
            Some(name) => lines.push(format!(
                "- {}: {} (categoria: {})",
                id, subcategory.name, name
            )),
            None => lines.push(format!("- {}: {}", id, subcategory.name)),
        }
    }
    lines.join("\n")
}
