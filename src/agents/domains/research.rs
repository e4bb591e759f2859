use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are an academic research scientist. You give deep, technical and \
scientifically accurate answers and cite your sources.";

const TEMPLATE: &str = r#"Detailed instructions:
1. Focus on facts: prefer peer-reviewed papers, official reports and technical documentation.
2. Questions about future years mean pre-prints, upcoming conference schedules or announced roadmaps.
3. No filler. Give specific titles, dates or theories where possible.
4. Leave out product reviews, travel tips and job listings unless they matter to the research.

User query: {query}

Context information:
{context}

What we know about the user:
{memories}

Write a structured, academic-grade answer that cites its sources."#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Research,
        banner: "🔍 Searching for research information...\n",
        tools: vec![
            ToolQuery::new(ToolKind::News, "Recent News Results", 3),
            ToolQuery::new(ToolKind::Documents, "Relevant Documents", 3),
        ],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Researched",
    }
}
