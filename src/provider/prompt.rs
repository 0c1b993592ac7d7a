use crate::request::{ChangeSpec, SchemaContext};

const PLANNING_CONTEXT: &str = include_str!("../../prompts/plan.md");

pub const SYSTEM_INSTRUCTION: &str =
    "Return ONLY valid JSON matching the Plan schema described in the prompt. No markdown.";

/// Build the user prompt shared by every provider
pub fn build_prompt(spec: &ChangeSpec, schema: &SchemaContext) -> String {
    format!(
        "{}\n\n## Change Request\n\n{}\n\n## Schema Context\n\n```json\n{}\n```\n\nReturn ONLY JSON matching the Plan schema.",
        PLANNING_CONTEXT.trim(),
        spec,
        schema.to_prompt_json()
    )
}
