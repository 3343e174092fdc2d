//! The generation capability consumed by the summary pipeline.
//!
//! Two backends implement [`GenerationClient`]: an extractive client that condenses text by
//! keeping its leading sentences and refuses free-text generation, and an Ollama-backed client
//! that issues HTTP requests directly to the runtime. The pipeline only sees the trait, so the
//! provider can be swapped without touching pipeline logic.

use crate::config::{Config, GenerationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const CONDENSE_TEMPERATURE: f32 = 0.1;

/// Errors surfaced by generation providers.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Provider was explicitly disabled or unreachable.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate text: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by condensation and free-text generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Compress `excerpt` into a summary of roughly `min_len..=max_len` words.
    async fn condense(
        &self,
        excerpt: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<String, GenerationClientError>;

    /// Produce a free-text continuation of `prompt`.
    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, GenerationClientError>;
}

/// Build a generation client based on configuration.
pub fn get_generation_client(config: &Config) -> Arc<dyn GenerationClient> {
    match config.generation_provider {
        GenerationProvider::None => Arc::new(ExtractiveClient::new()),
        GenerationProvider::Ollama => {
            let base_url = config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Arc::new(OllamaGenerationClient::new(
                base_url,
                config.summarization_model.clone(),
                config.generation_model.clone(),
            ))
        }
    }
}

/// Deterministic provider that condenses by keeping leading sentences within the word budget.
///
/// It has no language model behind it, so [`GenerationClient::generate_text`] always reports the
/// provider as unavailable and callers fall back to their fixed content.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveClient;

impl ExtractiveClient {
    /// Construct a new extractive client.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationClient for ExtractiveClient {
    async fn condense(
        &self,
        excerpt: &str,
        _min_len: usize,
        max_len: usize,
    ) -> Result<String, GenerationClientError> {
        let condensed = leading_sentences(excerpt, max_len);
        if condensed.is_empty() {
            return Err(GenerationClientError::GenerationFailed(
                "excerpt contains no words".into(),
            ));
        }
        Ok(condensed)
    }

    async fn generate_text(
        &self,
        _prompt: &str,
        _max_tokens: usize,
        _temperature: f32,
    ) -> Result<String, GenerationClientError> {
        Err(GenerationClientError::ProviderUnavailable(
            "extractive provider does not support free-text generation".into(),
        ))
    }
}

/// Collect whole sentences from the start of `text` until the next one would exceed `max_words`.
///
/// The first sentence is always kept, cut to `max_words` words if needed.
fn leading_sentences(text: &str, max_words: usize) -> String {
    let mut kept: Vec<String> = Vec::new();
    let mut used = 0usize;

    for sentence in text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
    {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if kept.is_empty() {
            let take = words.len().min(max_words.max(1));
            used = take;
            kept.push(words[..take].join(" "));
            continue;
        }
        if used + words.len() > max_words {
            break;
        }
        used += words.len();
        kept.push(words.join(" "));
    }

    kept.join(". ")
}

/// Client for a local Ollama runtime using the non-streaming `/api/generate` endpoint.
pub struct OllamaGenerationClient {
    http: Client,
    base_url: String,
    summarization_model: String,
    generation_model: String,
}

impl OllamaGenerationClient {
    /// Create a client targeting `base_url` with the given condensation and generation models.
    pub fn new(base_url: String, summarization_model: String, generation_model: String) -> Self {
        let http = Client::builder()
            .user_agent("study-guide/generation")
            .build()
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Falling back to default reqwest client");
                Client::new()
            });
        Self {
            http,
            base_url,
            summarization_model,
            generation_model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    async fn request(
        &self,
        model: &str,
        prompt: String,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, GenerationClientError> {
        let payload = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": temperature,
                "num_predict": max_tokens,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(GenerationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let text = body.response.trim();
        if text.is_empty() {
            return Err(GenerationClientError::InvalidResponse(
                "Ollama returned an empty response".into(),
            ));
        }
        Ok(text.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn condense(
        &self,
        excerpt: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<String, GenerationClientError> {
        let prompt = format!(
            "Summarize the following academic text in a single paragraph of {min_len} to {max_len} words. Keep it factual and neutral.\n\n{excerpt}"
        );
        // Roughly 4/3 tokens per word leaves room for the upper bound.
        let max_tokens = max_len + max_len / 3;
        self.request(
            &self.summarization_model,
            prompt,
            max_tokens,
            CONDENSE_TEMPERATURE,
        )
        .await
    }

    async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, GenerationClientError> {
        self.request(
            &self.generation_model,
            prompt.to_string(),
            max_tokens,
            temperature,
        )
        .await
    }
}
