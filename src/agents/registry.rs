//! Agent Registry
//!
//! Static mapping from [`Domain`] to its agent, built once at startup and
//! shared read-only by every request. There is no runtime registration.

use crate::agents::domains::profile_for;
use crate::agents::specialized::SpecializedAgent;
use crate::agents::DomainAgent;
use crate::llm::LLMClient;
use crate::tools::ToolRegistry;
use crate::types::{AgentDescriptor, AppError, Domain, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub struct AgentRegistry {
    agents: HashMap<Domain, Arc<dyn DomainAgent>>,
    /// Registration order, used for listings
    order: Vec<Domain>,
}

impl AgentRegistry {
    /// Build the standard registry: one [`SpecializedAgent`] per domain,
    /// sharing the completion provider and tools.
    pub fn from_domains(
        domains: &[Domain],
        llm: Arc<dyn LLMClient>,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self> {
        domains
            .iter()
            .fold(AgentRegistryBuilder::new(), |builder, &domain| {
                builder.with_agent(Arc::new(SpecializedAgent::new(
                    Arc::clone(&llm),
                    Arc::clone(&tools),
                    profile_for(domain),
                )))
            })
            .build()
    }

    /// Look up the agent for `domain`.
    ///
    /// A miss means the router produced a domain the registry does not
    /// serve. That is a contract violation, so it is reported as
    /// [`AppError::Resolution`] and never defaulted.
    pub fn resolve(&self, domain: Domain) -> Result<Arc<dyn DomainAgent>> {
        self.agents
            .get(&domain)
            .cloned()
            .ok_or_else(|| AppError::Resolution(format!("no agent registered for domain '{}'", domain)))
    }

    /// Resolve by identifier, for callers holding a raw string
    pub fn resolve_name(&self, name: &str) -> Result<Arc<dyn DomainAgent>> {
        let domain = name
            .parse::<Domain>()
            .map_err(|_| AppError::Resolution(format!("unknown domain identifier '{}'", name)))?;
        self.resolve(domain)
    }

    pub fn contains(&self, domain: Domain) -> bool {
        self.agents.contains_key(&domain)
    }

    /// Registered domains in registration order
    pub fn domains(&self) -> &[Domain] {
        &self.order
    }

    pub fn descriptors(&self) -> Vec<AgentDescriptor> {
        self.order
            .iter()
            .filter_map(|d| self.agents.get(d))
            .map(|agent| agent.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builder for creating AgentRegistry with fluent API
pub struct AgentRegistryBuilder {
    agents: Vec<Arc<dyn DomainAgent>>,
}

impl AgentRegistryBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Add an agent; its domain becomes its key
    pub fn with_agent(mut self, agent: Arc<dyn DomainAgent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Build the registry
    ///
    /// Fails on an empty agent list or two agents claiming the same domain.
    pub fn build(self) -> Result<AgentRegistry> {
        if self.agents.is_empty() {
            return Err(AppError::Configuration(
                "Agent registry needs at least one agent".to_string(),
            ));
        }

        let mut agents = HashMap::with_capacity(self.agents.len());
        let mut order = Vec::with_capacity(self.agents.len());
        for agent in self.agents {
            let domain = agent.domain();
            if agents.insert(domain, agent).is_some() {
                return Err(AppError::Configuration(format!(
                    "Domain '{}' registered twice",
                    domain
                )));
            }
            order.push(domain);
        }

        Ok(AgentRegistry { agents, order })
    }
}

impl Default for AgentRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
