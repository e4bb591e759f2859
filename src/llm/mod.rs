//! Completion Provider Clients and Abstractions
//!
//! Everything that generates text goes through the [`LLMClient`] trait: the
//! supervisor router classifies with `generate_with_system`, domain agents and
//! the legacy endpoint stream with `stream_with_system` / `stream_with_history`.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI-compatible APIs (Groq is the default deployment)
//! - `ollama` - Local Ollama server
//!
//! # Streaming
//!
//! Streams are returned as [`TextStream`]. They are lazy and cancellable:
//! dropping one closes the provider connection.

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, ModelParams, Provider, TextStream};
