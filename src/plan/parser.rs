//! Extracts a plan from free-form model output

use crate::error::ProviderError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::types::Plan;

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").expect("valid code block regex")
});

/// Parse raw model text into a Plan.
///
/// Accepts bare JSON, JSON inside a markdown code block, or the first
/// balanced `{...}` object embedded in prose.
pub fn parse_plan(raw: &str) -> Result<Plan, ProviderError> {
    let json_str = extract_json(raw).ok_or_else(|| {
        ProviderError::InvalidPlan("no JSON object found in response".to_string())
    })?;

    serde_json::from_str::<Plan>(&json_str).map_err(|e| {
        debug!(
            "Plan JSON rejected: {}...",
            &json_str.chars().take(200).collect::<String>()
        );
        ProviderError::InvalidPlan(e.to_string())
    })
}

/// Extract a JSON object from a string that might contain markdown code blocks
fn extract_json(s: &str) -> Option<String> {
    let trimmed = s.trim();

    // First try: the whole string is valid JSON
    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    // Second try: extract from markdown code block
    for cap in CODE_BLOCK.captures_iter(s) {
        let potential_json = cap.get(1)?.as_str().trim();
        if potential_json.starts_with('{')
            && serde_json::from_str::<serde_json::Value>(potential_json).is_ok()
        {
            return Some(potential_json.to_string());
        }
    }

    // Third try: find JSON object pattern
    let brace_start = s.find('{')?;
    let mut depth = 0;
    let mut end = brace_start;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[brace_start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = brace_start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    if depth == 0 && end > brace_start {
        let potential_json = &s[brace_start..end];
        if serde_json::from_str::<serde_json::Value>(potential_json).is_ok() {
            return Some(potential_json.to_string());
        }
    }

    None
}
