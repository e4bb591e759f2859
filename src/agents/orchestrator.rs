use crate::{
    agents::{AgentRegistry, SupervisorRouter},
    memory::{MemoryStore, DEFAULT_RECENT_LIMIT},
    types::{
        AppError, MemoryRecord, MultiAgentRequest, Result, RoutingDecision, Scalar, StreamEvent,
    },
};
use futures::{Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Span;

/// Per-request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    FetchingMemory,
    Routing,
    Streaming,
    WritingBack,
    Done,
    Errored,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::FetchingMemory => "fetching_memory",
            RequestState::Routing => "routing",
            RequestState::Streaming => "streaming",
            RequestState::WritingBack => "writing_back",
            RequestState::Done => "done",
            RequestState::Errored => "errored",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// Memory records fetched before routing
    pub recent_limit: usize,
    /// Deadline for routing plus streaming. `None` disables it.
    pub request_timeout: Option<Duration>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            request_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Logs a cancellation when a request's event stream is dropped before it
/// reached a terminal state (client disconnect).
struct RequestGuard {
    span: Span,
    state: RequestState,
}

impl RequestGuard {
    fn transition(&mut self, next: RequestState) {
        tracing::debug!(parent: &self.span, from = %self.state, to = %next, "Request state transition");
        self.state = next;
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if !matches!(self.state, RequestState::Done | RequestState::Errored) {
            tracing::info!(
                parent: &self.span,
                state = %self.state,
                "Request cancelled before completion, skipping write-back"
            );
        }
    }
}

/// Request-scoped coordinator: memory, routing, streaming, write-back.
///
/// Cheap to clone; every request gets its own event stream and shares only
/// the immutable registry, the router and the external stores.
#[derive(Clone)]
pub struct StreamOrchestrator {
    router: Arc<SupervisorRouter>,
    registry: Arc<AgentRegistry>,
    memory: Option<Arc<dyn MemoryStore>>,
    settings: OrchestratorSettings,
}

impl StreamOrchestrator {
    pub fn new(
        router: Arc<SupervisorRouter>,
        registry: Arc<AgentRegistry>,
        memory: Option<Arc<dyn MemoryStore>>,
    ) -> Self {
        Self {
            router,
            registry,
            memory,
            settings: OrchestratorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<SupervisorRouter> {
        &self.router
    }

    /// Best-effort read of the user's recent memories. Failures degrade to
    /// an empty context.
    pub async fn fetch_memories(&self, user_id: &str) -> Vec<MemoryRecord> {
        let Some(memory) = &self.memory else {
            return Vec::new();
        };

        match memory.retrieve_recent(user_id, self.settings.recent_limit).await {
            Ok(records) => {
                tracing::debug!(count = records.len(), backend = memory.name(), "Fetched memories");
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, backend = memory.name(), "Memory read failed, continuing without memories");
                Vec::new()
            }
        }
    }

    /// Classify a request without generating anything.
    pub async fn route(&self, request: &MultiAgentRequest) -> Result<RoutingDecision> {
        let memories = self.fetch_memories(&request.user_id).await;
        self.router
            .route(
                &request.message,
                &request.user_id,
                &request.conversation_history,
                &memories,
            )
            .await
    }

    /// Run one request and return its event stream.
    ///
    /// Every fragment is forwarded as soon as the agent yields it. A failure
    /// ends the stream with exactly one error event. Dropping the stream
    /// cancels the request: the agent's provider stream is dropped with it and
    /// no memory record is written.
    pub fn stream(&self, request: MultiAgentRequest) -> impl Stream<Item = StreamEvent> + Send + 'static {
        let this = self.clone();
        let span = tracing::info_span!(
            "request",
            request_id = %uuid::Uuid::new_v4(),
            user_id = %request.user_id,
            session_id = %request.session_id,
            mode = request.mode.as_str(),
        );
        let deadline = self.settings.request_timeout.map(|t| Instant::now() + t);

        async_stream::stream! {
            let MultiAgentRequest { user_id, session_id, message, mode, conversation_history } = request;
            let mut guard = RequestGuard { span: span.clone(), state: RequestState::FetchingMemory };
            tracing::debug!(parent: &span, "Request started");

            let memories = this.fetch_memories(&user_id).await;

            guard.transition(RequestState::Routing);
            let routed = match with_deadline(
                deadline,
                this.router.route(&message, &user_id, &conversation_history, &memories),
            )
            .await
            {
                Some(result) => result,
                None => Err(AppError::Classification(format!(
                    "classifier timed out after {}s",
                    this.timeout_secs()
                ))),
            };
            let decision = match routed {
                Ok(decision) => decision,
                Err(e) => {
                    tracing::error!(parent: &span, error = %e, "Routing failed");
                    guard.transition(RequestState::Errored);
                    yield StreamEvent::failure(&e, None, mode);
                    return;
                }
            };
            let domain = decision.domain;
            tracing::info!(parent: &span, domain = %domain, rationale = %decision.rationale, "Request routed");

            guard.transition(RequestState::Streaming);
            let agent = match this.registry.resolve(domain) {
                Ok(agent) => agent,
                Err(e) => {
                    tracing::error!(parent: &span, error = %e, domain = %domain, contract_violation = true, "Router produced a domain the registry does not serve");
                    guard.transition(RequestState::Errored);
                    yield StreamEvent::failure(&e, Some(domain), mode);
                    return;
                }
            };

            let mut fragments = agent.process(message.clone(), user_id.clone(), memories);
            let mut full_response = String::new();
            loop {
                let next = match with_deadline(deadline, fragments.next()).await {
                    Some(next) => next,
                    None => Some(Err(this.timeout_error())),
                };
                match next {
                    Some(Ok(text)) => {
                        full_response.push_str(&text);
                        yield StreamEvent::fragment(text, domain, mode);
                    }
                    Some(Err(e)) => {
                        tracing::error!(parent: &span, error = %e, domain = %domain, relayed_chars = full_response.chars().count(), "Generation failed mid-stream");
                        guard.transition(RequestState::Errored);
                        yield StreamEvent::failure(&e, Some(domain), mode);
                        return;
                    }
                    None => break,
                }
            }
            drop(fragments);

            guard.transition(RequestState::WritingBack);
            if let Some(memory) = &this.memory {
                let note = agent.memory_note(&message, &full_response);
                let mut metadata = note.metadata;
                metadata.insert("mode".into(), Scalar::from(mode.as_str()));
                metadata.insert("session_id".into(), Scalar::from(session_id.as_str()));
                if let Err(e) = memory.append(&user_id, &note.message, metadata).await {
                    tracing::warn!(parent: &span, error = %e, backend = memory.name(), "Memory write-back failed");
                }
            }

            guard.transition(RequestState::Done);
            tracing::info!(parent: &span, domain = %domain, response_chars = full_response.chars().count(), "Request completed");
        }
    }

    fn timeout_secs(&self) -> u64 {
        self.settings
            .request_timeout
            .map(|t| t.as_secs())
            .unwrap_or_default()
    }

    fn timeout_error(&self) -> AppError {
        AppError::LLM(format!("request timed out after {}s", self.timeout_secs()))
    }
}

/// Await `fut`, giving up at `deadline`.
async fn with_deadline<F: std::future::Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}
