use crate::{
    llm::LLMClient,
    memory::{format_history_for_prompt, format_memories_for_prompt, DEFAULT_HISTORY_WINDOW},
    types::{AppError, ConversationTurn, Domain, MemoryRecord, Result, RoutingDecision},
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// What the classifier said, before the closed-set remap.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Known(Domain),
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    domain: String,
    #[serde(default)]
    rationale: Option<String>,
}

/// Supervisor that maps every request to exactly one domain.
///
/// Uses an LLM (run at temperature 0) to classify the message in the light of
/// recent conversation turns and the user's memories. Identifiers outside the
/// enabled set are remapped to the default domain, so callers only ever see a
/// domain the registry serves. The router never writes to memory.
pub struct SupervisorRouter {
    llm: Arc<dyn LLMClient>,
    domains: Vec<Domain>,
    default_domain: Domain,
    history_window: usize,
}

impl SupervisorRouter {
    /// Creates a router over `domains`. `default_domain` must be one of them.
    pub fn new(llm: Arc<dyn LLMClient>, domains: Vec<Domain>, default_domain: Domain) -> Result<Self> {
        if !domains.contains(&default_domain) {
            return Err(AppError::Configuration(format!(
                "Default domain '{}' is not among the routable domains",
                default_domain
            )));
        }
        Ok(Self {
            llm,
            domains,
            default_domain,
            history_window: DEFAULT_HISTORY_WINDOW,
        })
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn default_domain(&self) -> Domain {
        self.default_domain
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Parse the classifier output.
    ///
    /// Accepted forms:
    /// - JSON: `{"domain": "travel", "rationale": "..."}`, possibly wrapped in prose or a code fence
    /// - Bare name: `"travel"`, `"  Travel. "`
    ///
    /// Empty output and a JSON object without a usable `domain` are
    /// unparseable. Any other free text, including a sentence that mentions
    /// a domain, is `Unknown` keyed by its first word.
    pub fn parse_classification(output: &str) -> Result<(Classification, Option<String>)> {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return Err(AppError::Classification("classifier returned no output".to_string()));
        }

        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                let raw: RawClassification = serde_json::from_str(&trimmed[start..=end])
                    .map_err(|e| AppError::Classification(format!("malformed classification: {}", e)))?;
                let name = raw.domain.trim().to_lowercase();
                if name.is_empty() {
                    return Err(AppError::Classification("classification has an empty domain".to_string()));
                }
                let classification = match name.parse::<Domain>() {
                    Ok(domain) => Classification::Known(domain),
                    Err(_) => Classification::Unknown(name),
                };
                return Ok((classification, raw.rationale.filter(|r| !r.trim().is_empty())));
            }
        }

        let lowered = trimmed.to_lowercase();
        let bare = lowered.trim_matches(|c: char| !c.is_alphanumeric() && c != '_');
        if !bare.contains(char::is_whitespace) {
            if let Ok(domain) = bare.parse::<Domain>() {
                return Ok((Classification::Known(domain), None));
            }
        }

        let first = lowered
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string();
        Ok((Classification::Unknown(first), None))
    }

    fn system_prompt(&self) -> String {
        let agents = self
            .domains
            .iter()
            .map(|d| format!("- {}: {}", d.as_str(), d.summary()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a supervisor that routes each user request to exactly one specialist agent.

Available agents:
{}

Use the conversation history and what you know about the user to resolve follow-up questions.
If no agent fits, answer with "{}".

Respond with ONLY a JSON object, nothing else:
{{"domain": "<agent name>", "rationale": "<one short sentence>"}}"#,
            agents, self.default_domain
        )
    }

    fn user_prompt(
        &self,
        message: &str,
        history: &[ConversationTurn],
        memories: &[MemoryRecord],
    ) -> String {
        let mut prompt = String::new();

        let history = format_history_for_prompt(history, self.history_window);
        if !history.is_empty() {
            prompt.push_str("Conversation so far:\n");
            prompt.push_str(&history);
            prompt.push_str("\n\n");
        }

        let memories = format_memories_for_prompt(memories);
        if !memories.is_empty() {
            prompt.push_str("Known about the user:\n");
            prompt.push_str(&memories);
            prompt.push_str("\n\n");
        }

        prompt.push_str("Request: ");
        prompt.push_str(message);
        prompt
    }

    /// Classify one request.
    ///
    /// Fails with [`AppError::Classification`] only when the completion
    /// provider is unreachable or its output cannot be parsed.
    pub async fn route(
        &self,
        message: &str,
        user_id: &str,
        history: &[ConversationTurn],
        memories: &[MemoryRecord],
    ) -> Result<RoutingDecision> {
        let output = self
            .llm
            .generate_with_system(&self.system_prompt(), &self.user_prompt(message, history, memories))
            .await
            .map_err(|e| AppError::Classification(format!("classifier unavailable: {}", e)))?;

        let (classification, rationale) = Self::parse_classification(&output)?;

        let (domain, raw, remapped) = match classification {
            Classification::Known(domain) if self.domains.contains(&domain) => {
                (domain, domain.as_str().to_string(), false)
            }
            Classification::Known(domain) => (self.default_domain, domain.as_str().to_string(), true),
            Classification::Unknown(name) => (self.default_domain, name, true),
        };

        if remapped {
            tracing::debug!(
                classified = %raw,
                fallback = %domain,
                "Classification outside the routable set, using default domain"
            );
        }

        let rationale = rationale.unwrap_or_else(|| {
            if remapped {
                format!("No specialist matched '{}'; using the default agent", raw)
            } else {
                format!("Request matches the {} agent", domain)
            }
        });

        let mut context = Map::new();
        context.insert("classified_domain".into(), Value::String(raw));
        context.insert("remapped".into(), Value::Bool(remapped));
        context.insert("user_id".into(), json!(user_id));
        context.insert("memory_count".into(), json!(memories.len()));
        context.insert("history_len".into(), json!(history.len()));

        Ok(RoutingDecision {
            domain,
            rationale,
            context,
        })
    }
}
