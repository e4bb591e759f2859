use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are a travel expert helping the user plan a trip.";

const TEMPLATE: &str = r#"User query: {query}

Travel information:
{context}

User travel preferences:
{memories}

Give detailed travel suggestions: flight and hotel tips, the best time to visit, a budget
estimate and local recommendations."#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Travel,
        banner: "✈️ Searching for travel options...\n",
        tools: vec![ToolQuery::new(ToolKind::Web, "Travel Search Results", 3)],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Travel Interest",
    }
}
