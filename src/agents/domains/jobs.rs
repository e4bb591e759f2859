use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are a career and talent acquisition specialist. You help users find \
jobs, improve resumes and navigate their careers.";

const TEMPLATE: &str = r#"Detailed instructions:
1. Only answer questions about jobs, careers, hiring or professional development. Otherwise say that
   you are the jobs agent and another specialist (such as research or finance) is a better fit.
2. For job searches, look for specific roles, locations and requirements.
3. For career advice, give actionable tips on interviews, networking and salary negotiation.
4. Never invent job postings. Only use the listings below.

User query: {query}

Available jobs:
{context}

User profile:
{memories}

Give professional career guidance or job listings."#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Jobs,
        banner: "💼 Searching for job opportunities...\n",
        tools: vec![ToolQuery::new(ToolKind::Jobs, "Job Listings", 5)],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Job Search",
    }
}
