//! Inputs to an orchestration run

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Free-form description of the desired change.
///
/// Sent to providers verbatim; only a sanitized copy is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSpec(String);

impl ChangeSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChangeSpec {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ChangeSpec {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for ChangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Description of the target system's current shape (collections, fields,
/// indexes). Passed through to every provider untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaContext(Value);

impl SchemaContext {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Pretty JSON with object keys in sorted order, so identical contexts
    /// always render to identical prompts
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}
