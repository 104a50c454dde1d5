//! Gemini backend implementation
//!
//! Talks to the Google Generative Language API
//! (`/v1beta/models/{model}:generateContent`).
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Subcategory};
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::parse_extraction;
use super::types::ExtractedExpense;
use super::{annotate_subcategories, LlmBackend};

const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gemini backend
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl Clone for GeminiBackend {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            prompts: self.prompts.clone(),
        }
    }
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL` (default: gemini-1.5-flash)
    /// Optional: `GEMINI_HOST`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        Some(Self::new(&host, &model, &api_key))
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
            api_key: self.api_key.clone(),
            prompts: self.prompts.clone(),
        }
    }

    /// Make a generateContent request and return the first candidate's text
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.1 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("Gemini API error {}: {}", status, body)));
        }

        let generated: GenerateContentResponse = response.json().await?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Llm("No candidates in Gemini response".into()))
    }

    fn build_prompt(
        &self,
        sms_text: &str,
        subcategories: &[Subcategory],
        categories: &[Category],
    ) -> Result<String> {
        let annotated = annotate_subcategories(subcategories, categories);
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::Config("prompt library lock poisoned".into()))?;
        let prompt = prompts.get(PromptId::ExtractExpense)?;

        let mut vars = HashMap::new();
        vars.insert("sms", sms_text);
        vars.insert("subcategories", annotated.as_str());
        Ok(prompt.render(&vars))
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn extract_expense(
        &self,
        sms_text: &str,
        subcategories: &[Subcategory],
        categories: &[Category],
    ) -> Result<ExtractedExpense> {
        let prompt = self.build_prompt(sms_text, subcategories, categories)?;
        debug!(model = %self.model, "sending extraction request to Gemini");
        let response = self.generate(&prompt).await?;
        parse_extraction(&response)
    }

    async fn health_check(&self) -> bool {
        // Listing models is the cheapest authenticated call.
        let url = format!("{}/v1beta/models", self.base_url);
        match self
            .http_client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}
