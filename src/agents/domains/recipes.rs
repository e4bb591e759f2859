use crate::agents::specialized::{DomainProfile, ToolQuery};
use crate::tools::ToolKind;
use crate::types::Domain;

const SYSTEM_PROMPT: &str = "You are a culinary expert and recipe guide.";

const TEMPLATE: &str = r#"User query: {query}

Recipe options:
{context}

User dietary preferences:
{memories}

Give detailed recipe recommendations with:
- Ingredients and quantities
- Step-by-step instructions
- Cooking time and difficulty
- Nutritional information if available
- Dietary notes and substitutions"#;

pub fn profile() -> DomainProfile {
    DomainProfile {
        domain: Domain::Recipes,
        banner: "👨‍🍳 Finding recipes for you...\n",
        tools: vec![ToolQuery::new(ToolKind::Recipes, "Recipe Options", 5)],
        system_prompt: SYSTEM_PROMPT,
        template: TEMPLATE,
        memory_prefix: "Recipe Interest",
    }
}
