use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are a financial advisor who gives balanced, well-informed insight.";

const TEMPLATE: &str = r#"User query: {query}

Financial context:
{context}

User profile:
{memories}

Give balanced, informative financial guidance and include disclaimers where appropriate."#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Finance,
        banner: "💰 Analyzing financial information...\n",
        tools: vec![ToolQuery::new(ToolKind::News, "Financial News", 5).with_suffix("financial news")],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Financial Query",
    }
}
