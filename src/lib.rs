//! # Maestro - supervisor-routed multi-agent assistant
//!
//! Maestro routes each user request to one domain-specialised agent (research,
//! finance, travel, shopping, jobs, recipes), enriches the agent with the
//! user's long-term memory and external search results, and streams the
//! generated answer back fragment by fragment over Server-Sent Events. After a
//! successful answer a short summary is written back to memory.
//!
//! ## Overview
//!
//! Maestro can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `maestro-server` binary
//! 2. **As a library** - Build a [`StreamOrchestrator`] from your own
//!    [`LLMClient`], [`MemoryStore`] and tools
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use maestro::{AgentRegistry, StreamOrchestrator, SupervisorRouter, ToolRegistry};
//! use maestro::types::{Domain, MultiAgentRequest};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client().await?);
//! let registry = AgentRegistry::from_domains(&Domain::ALL, llm.clone(), Arc::new(ToolRegistry::new()))?;
//! let router = SupervisorRouter::new(llm, Domain::ALL.to_vec(), Domain::Research)?;
//! let orchestrator = StreamOrchestrator::new(Arc::new(router), Arc::new(registry), None);
//!
//! let mut events = Box::pin(orchestrator.stream(request));
//! while let Some(event) = events.next().await {
//!     print!("{}", event.content.unwrap_or_default());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible providers such as Groq (default) |
//! | `ollama` | Ollama local inference (default) |
//!
//! ## Modules
//!
//! - [`agents`] - Supervisor router, domain agents, registry and stream orchestrator
//! - [`api`] - REST and SSE handlers and routes
//! - [`llm`] - Completion provider clients
//! - [`memory`] - Long-term memory stores
//! - [`tools`] - Search providers used as agent context
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

/// Routing, domain agents and stream orchestration.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command line interface.
pub mod cli;
/// Completion provider clients and abstractions.
pub mod llm;
/// Long-term memory stores.
pub mod memory;
/// Search tools used as agent context.
pub mod tools;
/// Core types (requests, events, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{AgentRegistry, AgentRegistryBuilder, StreamOrchestrator, SupervisorRouter};
pub use llm::{LLMClient, Provider};
pub use memory::MemoryStore;
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Result};
pub use utils::config::MaestroConfig;

use crate::agents::OrchestratorSettings;
use crate::memory::{InMemoryStore, Mem0Client};
use crate::tools::documents::DocumentSearchProvider;
use crate::tools::search::WebSearchProvider;
use crate::tools::serpapi::{SerpApiProvider, SerpEngine};
use crate::tools::ToolKind;
use crate::utils::config::MemoryBackend;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded and validated configuration
    pub config: Arc<MaestroConfig>,
    /// Request coordinator for the multi-agent stream
    pub orchestrator: StreamOrchestrator,
    /// Memory store, `None` when memory is disabled
    pub memory: Option<Arc<dyn MemoryStore>>,
    /// Completion provider for the legacy single-provider endpoint
    pub llm: Arc<dyn LLMClient>,
}

impl AppState {
    pub fn new(
        config: Arc<MaestroConfig>,
        orchestrator: StreamOrchestrator,
        memory: Option<Arc<dyn MemoryStore>>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            memory,
            llm,
        }
    }

    /// Build every collaborator from configuration.
    ///
    /// Runs once at startup; any error here means the server must not start.
    pub async fn from_config(config: MaestroConfig) -> Result<Self> {
        let llm: Arc<dyn LLMClient> = Arc::from(config.generation_provider()?.create_client().await?);
        let router_llm: Arc<dyn LLMClient> = Arc::from(config.router_provider()?.create_client().await?);
        tracing::info!(
            provider = config.provider.kind(),
            model = llm.model_name(),
            "Completion provider ready"
        );

        let tools = Arc::new(build_tools(&config)?);
        let domains = config.enabled_domains()?;
        let registry = Arc::new(AgentRegistry::from_domains(&domains, Arc::clone(&llm), tools)?);
        let router = Arc::new(
            SupervisorRouter::new(router_llm, domains, config.default_domain()?)?
                .with_history_window(config.router.history_window),
        );

        let memory = build_memory(&config)?;
        let orchestrator = StreamOrchestrator::new(router, registry, memory.clone()).with_settings(
            OrchestratorSettings {
                recent_limit: config.memory.recent_limit,
                request_timeout: config.server.request_timeout(),
            },
        );

        Ok(Self::new(Arc::new(config), orchestrator, memory, llm))
    }
}

fn build_tools(config: &MaestroConfig) -> Result<ToolRegistry> {
    let mut tools = ToolRegistry::new().with_timeout(Duration::from_secs(config.tools.timeout_secs));

    if let Some(env) = &config.tools.serpapi_key_env {
        let key = config.resolve_env(env)?;
        let base = &config.tools.serpapi_base_url;
        tools.register(ToolKind::News, Arc::new(SerpApiProvider::new(base, key.clone(), SerpEngine::News)?));
        tools.register(ToolKind::Jobs, Arc::new(SerpApiProvider::new(base, key.clone(), SerpEngine::Jobs)?));
        tools.register(ToolKind::Recipes, Arc::new(SerpApiProvider::new(base, key, SerpEngine::Recipes)?));
    } else {
        tracing::warn!("tools.serpapi_key_env not set, news, job and recipe search disabled");
    }

    if config.tools.web_search {
        tools.register(ToolKind::Web, Arc::new(WebSearchProvider::new()));
    }

    if let Some(documents) = &config.tools.documents {
        tools.register(
            ToolKind::Documents,
            Arc::new(DocumentSearchProvider::new(&documents.url, &documents.collection)?),
        );
    }

    Ok(tools)
}

fn build_memory(config: &MaestroConfig) -> Result<Option<Arc<dyn MemoryStore>>> {
    if !config.memory.enabled {
        tracing::info!("Memory disabled");
        return Ok(None);
    }

    let store: Arc<dyn MemoryStore> = match config.memory.backend {
        MemoryBackend::Mem0 => Arc::new(Mem0Client::new(
            &config.memory.base_url,
            config.resolve_env(&config.memory.api_key_env)?,
        )?),
        MemoryBackend::InMemory => Arc::new(InMemoryStore::new()),
    };
    tracing::info!(backend = store.name(), "Memory store ready");
    Ok(Some(store))
}
