//! Centavo Core Library
//!
//! Shared functionality for the centavo expense tracker:
//! - SMS-to-expense pipeline (sender filter, extraction, validation, insert)
//! - Pluggable LLM backends (Gemini, OpenAI-compatible)
//! - Postgrest-backed persistence for expenses, goals and the taxonomy
//! - Accent-insensitive text normalization
//! - Monthly aggregation (day groups, subcategory groups, goal rollups)
//! - Prompt library for customizable extraction prompts

pub mod aggregate;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod settings;
pub mod store;
pub mod taxonomy;
pub mod text;

pub use aggregate::CategoryRollup;
pub use error::{Error, Result};
pub use llm::{
    ExtractedExpense, GeminiBackend, LlmBackend, LlmClient, MockBackend, OpenAICompatibleBackend,
};
pub use models::{
    Category, Expense, ExpenseStatus, ExpenseView, Goal, GoalView, SortOrder, Subcategory,
};
pub use pipeline::{BatchSummary, SmsMessage, SmsOutcome, SmsPipeline};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use settings::Settings;
pub use store::{MemoryStore, PostgrestStore, Store, StoreClient};
pub use taxonomy::Taxonomy;
