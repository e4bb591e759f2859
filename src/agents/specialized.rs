use crate::{
    agents::{DomainAgent, MemoryNote},
    llm::{LLMClient, TextStream},
    memory::format_memories_for_prompt,
    tools::{Snippet, ToolKind, ToolRegistry},
    types::{AgentDescriptor, Domain, MemoryRecord},
};
use futures::StreamExt;
use std::sync::Arc;

/// One tool lookup an agent performs before prompting.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolQuery {
    pub kind: ToolKind,
    /// Heading of this tool's block in the prompt context
    pub label: &'static str,
    /// Appended to the user message to form the search query
    pub suffix: Option<&'static str>,
    pub limit: usize,
}

impl ToolQuery {
    pub fn new(kind: ToolKind, label: &'static str, limit: usize) -> Self {
        Self {
            kind,
            label,
            suffix: None,
            limit,
        }
    }

    pub fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn query_for(&self, message: &str) -> String {
        match self.suffix {
            Some(suffix) => format!("{} {}", message, suffix),
            None => message.to_string(),
        }
    }
}

/// Everything that distinguishes one domain agent from another.
///
/// `template` may use the placeholders `{query}`, `{context}` and
/// `{memories}`.
#[derive(Debug, Clone)]
pub struct DomainProfile {
    pub domain: Domain,
    pub banner: &'static str,
    pub tools: Vec<ToolQuery>,
    pub system_prompt: &'static str,
    pub template: &'static str,
    pub memory_prefix: &'static str,
}

impl DomainProfile {
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            domain: self.domain,
            capability: self.domain.summary().to_string(),
            tools: self.tools.iter().map(|t| t.kind.as_str().to_string()).collect(),
        }
    }

    /// Fill the template. Empty sections are rendered as explicit placeholders
    /// so the model knows the lookup happened and found nothing.
    pub fn render(&self, query: &str, context: &str, memories: &[MemoryRecord]) -> String {
        let memories = format_memories_for_prompt(memories);
        let memories = if memories.is_empty() {
            "No previous interactions.".to_string()
        } else {
            memories
        };
        let context = if context.trim().is_empty() {
            "No additional context available."
        } else {
            context
        };

        fill_template(
            self.template,
            &[("{query}", query), ("{context}", context), ("{memories}", &memories)],
        )
    }
}

/// Substitute placeholders in one pass over `template`. Inserted values are
/// copied verbatim and never searched for further placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render tool results as labelled bullet blocks.
pub fn format_tool_context(sections: &[(&str, Vec<Snippet>)]) -> String {
    sections
        .iter()
        .map(|(label, snippets)| {
            let body = if snippets.is_empty() {
                "- (no results)".to_string()
            } else {
                snippets
                    .iter()
                    .map(|s| format!("- {}: {}", s.title, s.snippet))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            format!("{}:\n{}", label, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The domain agent implementation, parameterised by a [`DomainProfile`].
///
/// Control flow is identical for every domain: emit the banner, gather tool
/// context (failures become empty sections), render the template, then relay
/// the provider's fragments unchanged and in order.
pub struct SpecializedAgent {
    llm: Arc<dyn LLMClient>,
    tools: Arc<ToolRegistry>,
    profile: Arc<DomainProfile>,
}

impl SpecializedAgent {
    pub fn new(llm: Arc<dyn LLMClient>, tools: Arc<ToolRegistry>, profile: DomainProfile) -> Self {
        Self {
            llm,
            tools,
            profile: Arc::new(profile),
        }
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    async fn gather_context(tools: &ToolRegistry, profile: &DomainProfile, message: &str) -> String {
        let mut sections = Vec::with_capacity(profile.tools.len());
        for query in &profile.tools {
            let results = tools
                .search_or_empty(query.kind, &query.query_for(message), query.limit)
                .await;
            sections.push((query.label, results));
        }
        format_tool_context(&sections)
    }
}

impl DomainAgent for SpecializedAgent {
    fn domain(&self) -> Domain {
        self.profile.domain
    }

    fn descriptor(&self) -> AgentDescriptor {
        self.profile.descriptor()
    }

    fn process(&self, message: String, user_id: String, memories: Vec<MemoryRecord>) -> TextStream {
        let llm = Arc::clone(&self.llm);
        let tools = Arc::clone(&self.tools);
        let profile = Arc::clone(&self.profile);

        let fragments = async_stream::stream! {
            yield Ok(profile.banner.to_string());

            let context = Self::gather_context(&tools, &profile, &message).await;
            let prompt = profile.render(&message, &context, &memories);
            tracing::debug!(
                domain = %profile.domain,
                user_id = %user_id,
                memory_count = memories.len(),
                prompt_chars = prompt.len(),
                "Prompt assembled"
            );

            match llm.stream_with_system(profile.system_prompt, &prompt).await {
                Ok(mut stream) => {
                    while let Some(item) = stream.next().await {
                        let failed = item.is_err();
                        yield item;
                        if failed {
                            break;
                        }
                    }
                }
                Err(e) => yield Err(e),
            }
        };

        Box::new(Box::pin(fragments))
    }

    fn memory_note(&self, message: &str, response: &str) -> MemoryNote {
        MemoryNote::summarize(self.profile.domain, self.profile.memory_prefix, message, response)
    }
}
