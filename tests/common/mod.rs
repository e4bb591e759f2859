//! Shared fixtures for the integration tests.
//!
//! Builds a fully wired [`AppState`] around scripted collaborators so tests
//! never touch a real completion provider, memory platform or search API.

#![allow(dead_code)]

pub mod mocks;

use maestro::agents::OrchestratorSettings;
use maestro::memory::MemoryStore;
use maestro::tools::{ToolKind, ToolProvider};
use maestro::types::{ConversationTurn, Domain, InteractionMode, MultiAgentRequest, StreamEvent};
use maestro::{
    AgentRegistry, AppState, LLMClient, MaestroConfig, StreamOrchestrator, SupervisorRouter,
    ToolRegistry,
};
use std::sync::Arc;
use std::time::Duration;

/// Minimal configuration; the provider section is never used to build a client.
pub fn test_config() -> MaestroConfig {
    toml::from_str(
        r#"
[provider]
type = "ollama"
model = "test-model"

[legacy]
system_prompt = "You are a helpful assistant."
"#,
    )
    .expect("test config should parse")
}

/// Everything a test may want to assert on after driving a request.
pub struct Harness {
    pub state: AppState,
    pub orchestrator: StreamOrchestrator,
}

pub struct HarnessBuilder {
    router_llm: Arc<dyn LLMClient>,
    agent_llm: Arc<dyn LLMClient>,
    memory: Option<Arc<dyn MemoryStore>>,
    tools: Vec<(ToolKind, Arc<dyn ToolProvider>)>,
    request_timeout: Option<Duration>,
    registry_domains: Vec<Domain>,
}

impl HarnessBuilder {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            router_llm: llm.clone(),
            agent_llm: llm,
            memory: None,
            tools: Vec::new(),
            request_timeout: None,
            registry_domains: Domain::ALL.to_vec(),
        }
    }

    /// Use a different client for classification than for generation.
    pub fn with_router_llm(mut self, llm: Arc<dyn LLMClient>) -> Self {
        self.router_llm = llm;
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_tool(mut self, kind: ToolKind, provider: Arc<dyn ToolProvider>) -> Self {
        self.tools.push((kind, provider));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Register agents for `domains` only. The router still knows every domain.
    pub fn with_registry_domains(mut self, domains: &[Domain]) -> Self {
        self.registry_domains = domains.to_vec();
        self
    }

    pub fn build(self) -> Harness {
        let mut tools = ToolRegistry::new();
        for (kind, provider) in self.tools {
            tools.register(kind, provider);
        }

        let registry = AgentRegistry::from_domains(&self.registry_domains, self.agent_llm.clone(), Arc::new(tools))
            .expect("registry should build");
        let router = SupervisorRouter::new(self.router_llm, Domain::ALL.to_vec(), Domain::Research)
            .expect("router should build");

        let orchestrator = StreamOrchestrator::new(Arc::new(router), Arc::new(registry), self.memory.clone())
            .with_settings(OrchestratorSettings {
                recent_limit: 5,
                request_timeout: self.request_timeout,
            });

        let state = AppState::new(
            Arc::new(test_config()),
            orchestrator.clone(),
            self.memory,
            self.agent_llm,
        );

        Harness { state, orchestrator }
    }
}

pub fn request(user_id: &str, message: &str) -> MultiAgentRequest {
    MultiAgentRequest {
        user_id: user_id.to_string(),
        session_id: format!("session-{}", user_id),
        message: message.to_string(),
        mode: InteractionMode::Text,
        conversation_history: Vec::<ConversationTurn>::new(),
    }
}

/// Concatenated `content` of every non-error event.
pub fn joined_content(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter(|e| !e.is_error())
        .filter_map(|e| e.content.as_deref())
        .collect()
}

/// Parse the `data:` lines of an SSE body into events.
pub fn parse_sse(body: &str) -> Vec<StreamEvent> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).expect("event should be JSON"))
        .collect()
}
