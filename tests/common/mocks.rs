//! Mock collaborators for testing.
//!
//! The LLM client is scripted: classification calls (`generate_with_system`)
//! return a fixed answer, streaming calls replay a list of fragments and can
//! be told to fail or stall part-way through.

use async_trait::async_trait;
use maestro::llm::{LLMClient, TextStream};
use maestro::memory::{InMemoryStore, MemoryStore};
use maestro::tools::{Snippet, ToolProvider};
use maestro::types::{AppError, MemoryRecord, Metadata, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// What a streaming call does after its scripted fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamEnd {
    /// Finish normally
    Complete,
    /// Yield a provider error
    Fail,
    /// Never finish
    Stall,
}

/// Sets its flag when dropped. Moved into a stream to observe cancellation.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct MockLLMClient {
    classification: Option<String>,
    fragments: Vec<String>,
    end: StreamEnd,
    open_fails: bool,
    classifier_stalls: bool,
    completion: Option<String>,
    /// Set once a provider stream has been dropped
    pub stream_dropped: Arc<AtomicBool>,
    /// Fragments actually pulled out of provider streams
    pub fragments_pulled: Arc<AtomicUsize>,
    /// User prompts seen by the classifier
    pub classifier_prompts: Arc<Mutex<Vec<String>>>,
    /// Message lists seen by history-based calls
    pub history_calls: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl MockLLMClient {
    /// Classifies as `classification` and streams `fragments`.
    pub fn new(classification: &str, fragments: &[&str]) -> Self {
        Self {
            classification: Some(classification.to_string()),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            end: StreamEnd::Complete,
            open_fails: false,
            classifier_stalls: false,
            completion: None,
            stream_dropped: Arc::new(AtomicBool::new(false)),
            fragments_pulled: Arc::new(AtomicUsize::new(0)),
            classifier_prompts: Arc::new(Mutex::new(Vec::new())),
            history_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Classification always fails.
    pub fn unreachable_classifier(mut self) -> Self {
        self.classification = None;
        self
    }

    /// Classification never returns.
    pub fn stalling_classifier(mut self) -> Self {
        self.classifier_stalls = true;
        self
    }

    pub fn ending_with(mut self, end: StreamEnd) -> Self {
        self.end = end;
        self
    }

    /// Opening a stream fails; non-streamed completions return `completion`.
    pub fn without_streaming(mut self, completion: Option<&str>) -> Self {
        self.open_fails = true;
        self.completion = completion.map(str::to_string);
        self
    }

    fn open_stream(&self) -> Result<TextStream> {
        if self.open_fails {
            return Err(AppError::LLM("Mock stream unavailable".to_string()));
        }

        let fragments = self.fragments.clone();
        let end = self.end;
        let pulled = self.fragments_pulled.clone();
        let flag = DropFlag(self.stream_dropped.clone());

        let stream = async_stream::stream! {
            let _flag = flag;
            for fragment in fragments {
                pulled.fetch_add(1, Ordering::SeqCst);
                yield Ok(fragment);
            }
            match end {
                StreamEnd::Complete => {}
                StreamEnd::Fail => yield Err(AppError::LLM("Stream error: connection reset".to_string())),
                StreamEnd::Stall => futures::future::pending::<()>().await,
            }
        };
        Ok(Box::new(Box::pin(stream)))
    }

    fn complete(&self) -> Result<String> {
        self.completion
            .clone()
            .ok_or_else(|| AppError::LLM("Mock LLM failure".to_string()))
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.complete()
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.classifier_prompts.lock().push(prompt.to_string());
        if self.classifier_stalls {
            futures::future::pending::<()>().await;
        }
        self.classification
            .clone()
            .ok_or_else(|| AppError::LLM("connection refused".to_string()))
    }

    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
        self.history_calls.lock().push(messages.to_vec());
        self.complete()
    }

    async fn stream_with_system(&self, _system: &str, _prompt: &str) -> Result<TextStream> {
        self.open_stream()
    }

    async fn stream_with_history(&self, messages: &[(String, String)]) -> Result<TextStream> {
        self.history_calls.lock().push(messages.to_vec());
        self.open_stream()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// In-memory store that also counts calls.
#[derive(Default)]
pub struct RecordingMemoryStore {
    inner: InMemoryStore,
    pub appends: AtomicUsize,
    pub reads: AtomicUsize,
}

impl RecordingMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self, owner: &str) -> Vec<MemoryRecord> {
        self.inner.records(owner)
    }

    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemoryStore for RecordingMemoryStore {
    async fn append(&self, owner: &str, message: &str, metadata: Metadata) -> Result<MemoryRecord> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.append(owner, message, metadata).await
    }

    async fn retrieve_recent(&self, owner: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.retrieve_recent(owner, limit).await
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Store whose every call fails.
#[derive(Default)]
pub struct FailingMemoryStore {
    pub appends: AtomicUsize,
}

#[async_trait]
impl MemoryStore for FailingMemoryStore {
    async fn append(&self, _owner: &str, _message: &str, _metadata: Metadata) -> Result<MemoryRecord> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Memory("store unreachable".to_string()))
    }

    async fn retrieve_recent(&self, _owner: &str, _limit: usize) -> Result<Vec<MemoryRecord>> {
        Err(AppError::Memory("store unreachable".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Tool that returns the same snippets for every query.
pub struct StaticToolProvider {
    snippets: Vec<Snippet>,
    pub queries: Mutex<Vec<String>>,
}

impl StaticToolProvider {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ToolProvider for StaticToolProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>> {
        self.queries.lock().push(query.to_string());
        Ok(self.snippets.iter().take(limit).cloned().collect())
    }
}
