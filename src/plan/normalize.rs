//! Canonical ordering for plans so that proposals from different backends can
//! be compared regardless of the order each backend emitted entries in.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::Deref;

use super::types::{DbOperation, DbPlan, Patch, Plan, PsPlan, Step, UiPlan};

/// A plan whose sub-collections are in canonical order.
///
/// Only obtainable through [`normalize`]; deserializing one normalizes too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Plan", from = "Plan")]
pub struct NormalizedPlan(Plan);

impl NormalizedPlan {
    pub fn as_plan(&self) -> &Plan {
        &self.0
    }

    pub fn into_inner(self) -> Plan {
        self.0
    }

    /// Deterministic JSON encoding (fixed field order, sorted extra keys)
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// SHA-256 hex digest of the canonical encoding
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let canonical = self.canonical_json()?;
        Ok(format!("{:x}", Sha256::digest(canonical.as_bytes())))
    }
}

impl Deref for NormalizedPlan {
    type Target = Plan;

    fn deref(&self) -> &Plan {
        &self.0
    }
}

impl From<Plan> for NormalizedPlan {
    fn from(plan: Plan) -> Self {
        normalize(&plan)
    }
}

impl From<NormalizedPlan> for Plan {
    fn from(plan: NormalizedPlan) -> Self {
        plan.0
    }
}

/// Field each entry type is ordered by
trait SortKey {
    fn sort_key(&self) -> &str;
}

impl SortKey for Patch {
    fn sort_key(&self) -> &str {
        self.target_path.as_deref().unwrap_or("")
    }
}

impl SortKey for DbOperation {
    fn sort_key(&self) -> &str {
        self.collection.as_deref().unwrap_or("")
    }
}

impl SortKey for Step {
    fn sort_key(&self) -> &str {
        self.target_path.as_deref().unwrap_or("")
    }
}

/// Produce the canonical form of a plan.
///
/// Patches and steps are ordered by `targetPath`, database operations by
/// `collection`, using ordinal comparison with a missing key treated as "".
/// Entries sharing a key fall back to their JSON encoding so that any
/// permutation of the same entries yields the same result.
pub fn normalize(plan: &Plan) -> NormalizedPlan {
    NormalizedPlan(Plan {
        ui: UiPlan {
            patches: sorted(&plan.ui.patches),
        },
        db: DbPlan {
            reads: sorted(&plan.db.reads),
            writes: sorted(&plan.db.writes),
        },
        ps: PsPlan {
            steps: sorted(&plan.ps.steps),
        },
    })
}

fn sorted<T>(entries: &[T]) -> Vec<T>
where
    T: SortKey + Serialize + Clone,
{
    let mut out = entries.to_vec();
    out.sort_by_cached_key(|entry| {
        (
            entry.sort_key().to_string(),
            serde_json::to_string(entry).unwrap_or_default(),
        )
    });
    out
}
