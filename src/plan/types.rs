//! Change-plan model shared by providers, the quorum engine and the audit log.
//!
//! Backends emit camelCase JSON. Every entry keeps the fields we do not model
//! in `extra`, so nothing a provider proposed is lost on the way to the audit
//! record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A three-part change proposal: UI patches, database I/O and processing steps
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ui: UiPlan,

    #[serde(default, deserialize_with = "null_as_default")]
    pub db: DbPlan,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ps: PsPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UiPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub patches: Vec<Patch>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DbPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reads: Vec<DbOperation>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub writes: Vec<DbOperation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PsPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
}

/// A UI source patch
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A database read or write against one collection
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_reads: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A processing step (server-side patch)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patch {
    pub fn new(target_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target_path: Some(target_path.into()),
            content: Some(content.into()),
            extra: Map::new(),
        }
    }
}

impl DbOperation {
    pub fn new(collection: impl Into<String>, estimated_reads: Option<f64>) -> Self {
        Self {
            collection: Some(collection.into()),
            estimated_reads,
            extra: Map::new(),
        }
    }
}

impl Step {
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: Some(target_path.into()),
            extra: Map::new(),
        }
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_plan() {
        let json = r#"{
            "version": "1.5.0",
            "ui": {
                "patches": [
                    {"op": "CREATE_OR_REPLACE", "targetPath": "src/pages/Admin.jsx", "content": "export default 1;"}
                ]
            },
            "db": {
                "reads": [{"collection": "products", "estimatedReads": 1, "limit": 50}],
                "writes": [{"collection": "modules", "op": "set"}]
            },
            "ps": {"steps": [{"targetPath": "functions/src/index.js", "note": "export"}]},
            "meta": {"summary": "ignored"}
        }"#;

        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.ui.patches.len(), 1);
        assert_eq!(
            plan.ui.patches[0].target_path.as_deref(),
            Some("src/pages/Admin.jsx")
        );
        assert_eq!(plan.ui.patches[0].extra["op"], "CREATE_OR_REPLACE");
        assert_eq!(plan.db.reads[0].estimated_reads, Some(1.0));
        assert_eq!(plan.db.reads[0].extra["limit"], 50);
        assert_eq!(plan.db.writes[0].collection.as_deref(), Some("modules"));
        assert_eq!(plan.ps.steps[0].extra["note"], "export");
    }

    #[test]
    fn test_missing_and_null_sections_are_empty() {
        let plan: Plan = serde_json::from_str(r#"{"ui": null, "db": {"reads": null}}"#).unwrap();
        assert!(plan.ui.patches.is_empty());
        assert!(plan.db.reads.is_empty());
        assert!(plan.db.writes.is_empty());
        assert!(plan.ps.steps.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let plan = Plan {
            db: DbPlan {
                reads: vec![DbOperation::new("orders", Some(2.0))],
                writes: vec![],
            },
            ..Plan::default()
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["db"]["reads"][0]["estimatedReads"], 2.0);
        assert_eq!(json["db"]["reads"][0]["collection"], "orders");
    }
}
