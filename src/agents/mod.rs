//! Routing and streaming core
//!
//! - [`router::SupervisorRouter`] classifies a request into exactly one [`Domain`]
//! - [`DomainAgent`] is the uniform contract every domain satisfies;
//!   [`specialized::SpecializedAgent`] is the implementation, parameterised by a
//!   [`specialized::DomainProfile`] from [`domains`]
//! - [`registry::AgentRegistry`] maps domains to agents, built once at startup
//! - [`orchestrator::StreamOrchestrator`] sequences memory, routing, streaming
//!   and write-back for one request

pub mod domains;
pub mod orchestrator;
pub mod registry;
pub mod router;
pub mod specialized;

use crate::llm::TextStream;
use crate::memory::truncate_chars;
use crate::types::{AgentDescriptor, Domain, MemoryRecord, Metadata, Scalar};

pub use orchestrator::{OrchestratorSettings, StreamOrchestrator};
pub use registry::{AgentRegistry, AgentRegistryBuilder};
pub use router::SupervisorRouter;
pub use specialized::{DomainProfile, SpecializedAgent};

/// Characters of the user message kept in a memory note.
pub const NOTE_MESSAGE_CHARS: usize = 100;

/// Characters of the response kept as `response_excerpt`.
pub const NOTE_EXCERPT_CHARS: usize = 200;

/// The record a successful interaction leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNote {
    pub message: String,
    pub metadata: Metadata,
}

impl MemoryNote {
    /// Build the standard note: `"<prefix>: <message head>"` tagged with the
    /// domain, the full query and a summary of the response text.
    pub fn summarize(domain: Domain, prefix: &str, message: &str, response: &str) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("domain".into(), Scalar::from(domain.as_str()));
        metadata.insert("query".into(), Scalar::from(message));
        metadata.insert("response_length".into(), Scalar::from(response.chars().count()));
        metadata.insert(
            "response_excerpt".into(),
            Scalar::from(truncate_chars(response, NOTE_EXCERPT_CHARS)),
        );

        Self {
            message: format!("{}: {}", prefix, truncate_chars(message, NOTE_MESSAGE_CHARS)),
            metadata,
        }
    }
}

/// Contract shared by every domain agent.
///
/// Agents differ only in tool selection and prompt text. The orchestrator
/// treats them interchangeably and owns the memory write-back: it asks the
/// agent for its [`MemoryNote`] once the fragment stream has completed
/// normally, so a failed or cancelled request never leaves a record behind.
pub trait DomainAgent: Send + Sync {
    fn domain(&self) -> Domain;

    fn descriptor(&self) -> AgentDescriptor;

    /// Start answering `message`.
    ///
    /// The returned stream is lazy and finite. Nothing happens until it is
    /// polled; dropping it stops the work and closes the provider connection.
    /// An `Err` item is terminal.
    fn process(&self, message: String, user_id: String, memories: Vec<MemoryRecord>) -> TextStream;

    /// Summary persisted after `response` was fully delivered.
    fn memory_note(&self, message: &str, response: &str) -> MemoryNote;
}
