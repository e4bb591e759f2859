use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are a shopping assistant who recommends products that fit the user's needs.";

const TEMPLATE: &str = r#"User query: {query}

Available products and options:
{context}

User preferences:
{memories}

Recommend products thoughtfully, with pros and cons and budget considerations."#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Shopping,
        banner: "🛍️ Finding product recommendations...\n",
        tools: vec![ToolQuery::new(ToolKind::News, "Product Coverage", 5).with_suffix("products reviews")],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Shopping Interest",
    }
}
