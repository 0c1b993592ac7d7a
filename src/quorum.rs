//! Pairwise agreement between normalized plans.
//!
//! Two plans agree when the UI files they touch overlap by at least
//! [`QUORUM_THRESHOLD`]. Database and processing sections are normalized but
//! do not take part in the comparison.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::plan::NormalizedPlan;

/// Minimum similarity (inclusive) for two plans to count as agreeing
pub const QUORUM_THRESHOLD: f64 = 0.85;

/// Outcome of a quorum search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumResult {
    pub found: bool,
    /// `[i, j]` of the agreeing pair, empty when no pair qualifies
    pub indices: Vec<usize>,
}

impl QuorumResult {
    fn pair(i: usize, j: usize) -> Self {
        Self {
            found: true,
            indices: vec![i, j],
        }
    }

    fn none() -> Self {
        Self {
            found: false,
            indices: Vec::new(),
        }
    }
}

/// Overlap of distinct UI target paths: `|A ∩ B| / max(|A|, |B|)`.
///
/// Returns 0.0 when neither plan has UI patches. A patch without a target
/// path counts as one distinct "absent" path.
pub fn similarity(a: &NormalizedPlan, b: &NormalizedPlan) -> f64 {
    let paths_a = ui_paths(a);
    let paths_b = ui_paths(b);

    let matches = paths_a.intersection(&paths_b).count();
    let total = paths_a.len().max(paths_b.len());

    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

fn ui_paths(plan: &NormalizedPlan) -> HashSet<Option<&str>> {
    plan.ui
        .patches
        .iter()
        .map(|p| p.target_path.as_deref())
        .collect()
}

/// Find the first pair of plans, scanning `(0,1), (0,2), ..., (1,2), ...`,
/// whose similarity reaches the threshold. First match wins, not best match.
pub fn find_quorum(plans: &[NormalizedPlan]) -> QuorumResult {
    for i in 0..plans.len() {
        for j in (i + 1)..plans.len() {
            if similarity(&plans[i], &plans[j]) >= QUORUM_THRESHOLD {
                return QuorumResult::pair(i, j);
            }
        }
    }
    QuorumResult::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{normalize, Patch, Plan, UiPlan};

    fn plan_with_paths(paths: &[&str]) -> NormalizedPlan {
        normalize(&Plan {
            ui: UiPlan {
                patches: paths.iter().map(|p| Patch::new(*p, "content")).collect(),
            },
            ..Plan::default()
        })
    }

    #[test]
    fn test_identical_paths_are_fully_similar() {
        let a = plan_with_paths(&["a.jsx", "b.jsx"]);
        let b = plan_with_paths(&["b.jsx", "a.jsx"]);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_empty_plans_have_zero_similarity() {
        let a = plan_with_paths(&[]);
        let b = plan_with_paths(&[]);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_denominator_is_larger_set() {
        let a = plan_with_paths(&["a", "b", "c", "d"]);
        let b = plan_with_paths(&["a", "b"]);
        assert_eq!(similarity(&a, &b), 0.5);
        assert_eq!(similarity(&b, &a), 0.5);
    }

    #[test]
    fn test_duplicate_paths_count_once() {
        let a = plan_with_paths(&["a", "a", "b"]);
        let b = plan_with_paths(&["a", "b"]);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 17 of 20 shared = 0.85 exactly
        let shared: Vec<String> = (0..17).map(|i| format!("shared{}", i)).collect();
        let mut left: Vec<String> = shared.clone();
        left.extend((0..3).map(|i| format!("left{}", i)));
        let mut right: Vec<String> = shared;
        right.extend((0..3).map(|i| format!("right{}", i)));

        let left: Vec<&str> = left.iter().map(String::as_str).collect();
        let right: Vec<&str> = right.iter().map(String::as_str).collect();
        let a = plan_with_paths(&left);
        let b = plan_with_paths(&right);

        assert!((similarity(&a, &b) - 0.85).abs() < 1e-12);
        assert!(find_quorum(&[a, b]).found);
    }

    #[test]
    fn test_below_threshold() {
        // 5 of 6 shared = 0.833...
        let a = plan_with_paths(&["a", "b", "c", "d", "e", "f"]);
        let b = plan_with_paths(&["a", "b", "c", "d", "e", "g"]);
        assert!(!find_quorum(&[a, b]).found);
    }

    #[test]
    fn test_quorum_on_first_pair() {
        let plans = vec![
            plan_with_paths(&["a.jsx", "b.jsx"]),
            plan_with_paths(&["b.jsx", "a.jsx"]),
            plan_with_paths(&["x.jsx"]),
        ];
        assert_eq!(
            find_quorum(&plans),
            QuorumResult {
                found: true,
                indices: vec![0, 1]
            }
        );
    }

    #[test]
    fn test_quorum_on_later_pair() {
        let plans = vec![
            plan_with_paths(&["x.jsx"]),
            plan_with_paths(&["a.jsx"]),
            plan_with_paths(&["a.jsx"]),
        ];
        assert_eq!(find_quorum(&plans).indices, vec![1, 2]);
    }

    #[test]
    fn test_first_match_not_best_match() {
        let base: Vec<String> = (0..10).map(|i| format!("p{}", i)).collect();
        let mut variant: Vec<String> = base[..9].to_vec();
        variant.push("q".to_string());

        let base: Vec<&str> = base.iter().map(String::as_str).collect();
        let variant: Vec<&str> = variant.iter().map(String::as_str).collect();

        // (0,1) = 0.9 clears the threshold before the perfect (1,2) pair
        let plans = vec![
            plan_with_paths(&base),
            plan_with_paths(&variant),
            plan_with_paths(&variant),
        ];
        assert_eq!(find_quorum(&plans).indices, vec![0, 1]);

        let plans = vec![
            plan_with_paths(&base),
            plan_with_paths(&["z"]),
            plan_with_paths(&base),
        ];
        assert_eq!(find_quorum(&plans).indices, vec![0, 2]);
    }

    #[test]
    fn test_no_quorum_when_all_disagree() {
        let plans = vec![
            plan_with_paths(&["a.jsx"]),
            plan_with_paths(&["b.jsx"]),
            plan_with_paths(&["c.jsx"]),
        ];
        assert_eq!(
            find_quorum(&plans),
            QuorumResult {
                found: false,
                indices: vec![]
            }
        );
    }

    #[test]
    fn test_db_sections_do_not_affect_similarity() {
        let mut a = plan_with_paths(&["a.jsx"]).into_inner();
        a.db.reads.push(crate::plan::DbOperation::new("orders", Some(1.0)));
        let b = plan_with_paths(&["a.jsx"]);
        assert_eq!(similarity(&normalize(&a), &b), 1.0);
    }
}
