//! Completion provider abstractions
//!
//! This module provides a unified interface over the completion providers the
//! server can talk to:
//! - **OpenAI-compatible**: OpenAI, Groq, OpenRouter and other compatible endpoints
//! - **Ollama**: local LLM inference

use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Incremental text produced by a provider. Dropping the stream closes the
/// underlying connection.
pub type TextStream = Box<dyn futures::Stream<Item = Result<String>> + Send + Unpin>;

/// Generic LLM client trait for provider abstraction
///
/// All providers implement this trait, so agents, the router and the legacy
/// endpoint never depend on a concrete provider.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate with conversation history
    async fn generate_with_history(
        &self,
        messages: &[(String, String)], // (role, content) pairs
    ) -> Result<String>;

    /// Stream a completion with a system prompt
    async fn stream_with_system(&self, system: &str, prompt: &str) -> Result<TextStream>;

    /// Stream a completion from conversation history
    async fn stream_with_history(&self, messages: &[(String, String)]) -> Result<TextStream>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Sampling parameters applied to every request a client makes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Provider enum for runtime selection
///
/// | Provider | Streaming | Feature |
/// |----------|-----------|---------|
/// | OpenAI-compatible | ✅ | `openai` |
/// | Ollama | ✅ | `ollama` |
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Groq and other compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: std::env::var("GROQ_API")?,
    ///     api_base: "https://api.groq.com/openai/v1".to_string(),
    ///     model: "llama-3.1-8b-instant".to_string(),
    ///     params: ModelParams::default(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Ollama local LLM provider
    Ollama {
        base_url: String,
        model: String,
        params: ModelParams,
    },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the provider was compiled out.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *params,
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                params,
            } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone(), *params).await?,
            )),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Configuration(format!(
                "{} provider support is not compiled in (enable the '{}' feature)",
                other.name(),
                other.feature()
            ))),
        }
    }

    /// Whether this build can create a client for the provider
    pub fn is_compiled(&self) -> bool {
        match self {
            Provider::OpenAI { .. } => cfg!(feature = "openai"),
            Provider::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    fn feature(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Ollama { .. } => "ollama",
        }
    }

    /// Same provider with different sampling parameters
    pub fn with_params(&self, new_params: ModelParams) -> Self {
        let mut provider = self.clone();
        match &mut provider {
            Provider::OpenAI { params, .. } | Provider::Ollama { params, .. } => {
                *params = new_params
            }
        }
        provider
    }

    pub fn params(&self) -> ModelParams {
        match self {
            Provider::OpenAI { params, .. } | Provider::Ollama { params, .. } => *params,
        }
    }
}
