//! Performance budget check for an agreed plan.
//!
//! The estimates are heuristics: raw patch size scaled by a minification
//! factor for bundle weight, and a linear cost per KB for time-to-interactive.

use serde::{Deserialize, Serialize};

use crate::config::BudgetConfig;
use crate::plan::Plan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfMetrics {
    #[serde(rename = "estimatedBundleSizeKB")]
    pub estimated_bundle_size_kb: f64,

    #[serde(rename = "estimatedTTIImpactMs")]
    pub estimated_tti_impact_ms: f64,

    #[serde(rename = "estimatedReadsPerAction")]
    pub estimated_reads_per_action: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfValidation {
    pub valid: bool,
    pub issues: Vec<String>,
    pub metrics: PerfMetrics,
}

/// Validate against the default budget (5KB bundle, 2 reads per action)
pub fn validate_performance(plan: &Plan) -> PerfValidation {
    validate_performance_with(plan, &BudgetConfig::default())
}

pub fn validate_performance_with(plan: &Plan, budget: &BudgetConfig) -> PerfValidation {
    // String length as the browser counts it (UTF-16 code units)
    let total_code_length: usize = plan
        .ui
        .patches
        .iter()
        .map(|p| p.content.as_deref().map_or(0, |c| c.encode_utf16().count()))
        .sum();

    let estimated_bundle_size_kb = (total_code_length as f64 / 1024.0) * budget.compression_factor;

    let total_reads: f64 = plan
        .db
        .reads
        .iter()
        .map(|r| r.estimated_reads.unwrap_or(0.0))
        .sum();

    let mut issues = Vec::new();

    if estimated_bundle_size_kb > budget.max_bundle_kb {
        issues.push(format!(
            "Bundle size {:.2}KB exceeds {}KB",
            estimated_bundle_size_kb, budget.max_bundle_kb
        ));
    }

    if total_reads > budget.max_reads_per_action {
        issues.push(format!(
            "Reads {} exceeds {}",
            total_reads, budget.max_reads_per_action
        ));
    }

    PerfValidation {
        valid: issues.is_empty(),
        issues,
        metrics: PerfMetrics {
            estimated_bundle_size_kb,
            estimated_tti_impact_ms: estimated_bundle_size_kb * budget.tti_ms_per_kb,
            estimated_reads_per_action: total_reads,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DbOperation, DbPlan, Patch, UiPlan};

    fn plan_with_content(len: usize) -> Plan {
        Plan {
            ui: UiPlan {
                patches: vec![Patch::new("src/App.jsx", "x".repeat(len))],
            },
            ..Plan::default()
        }
    }

    fn plan_with_reads(reads: &[Option<f64>]) -> Plan {
        Plan {
            db: DbPlan {
                reads: reads
                    .iter()
                    .map(|r| DbOperation::new("products", *r))
                    .collect(),
                writes: vec![],
            },
            ..Plan::default()
        }
    }

    #[test]
    fn test_bundle_over_budget() {
        let result = validate_performance(&plan_with_content(17_500));
        assert!(!result.valid);
        assert!((result.metrics.estimated_bundle_size_kb - 5.127).abs() < 0.001);
        assert_eq!(result.issues, vec!["Bundle size 5.13KB exceeds 5KB"]);
    }

    #[test]
    fn test_bundle_within_budget() {
        let result = validate_performance(&plan_with_content(17_000));
        assert!(result.valid);
        assert!(result.issues.is_empty());
        assert!((result.metrics.estimated_bundle_size_kb - 4.98).abs() < 0.01);
        assert!(
            (result.metrics.estimated_tti_impact_ms - result.metrics.estimated_bundle_size_kb * 2.0)
                .abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_content_summed_across_patches() {
        let plan = Plan {
            ui: UiPlan {
                patches: vec![
                    Patch::new("a.jsx", "x".repeat(9_000)),
                    Patch::new("b.jsx", "x".repeat(9_000)),
                    Patch {
                        target_path: Some("c.jsx".to_string()),
                        content: None,
                        extra: Default::default(),
                    },
                ],
            },
            ..Plan::default()
        };
        assert!(!validate_performance(&plan).valid);
    }

    #[test]
    fn test_reads_over_budget() {
        let result = validate_performance(&plan_with_reads(&[Some(2.0), Some(1.0)]));
        assert!(!result.valid);
        assert_eq!(result.issues, vec!["Reads 3 exceeds 2"]);
        assert_eq!(result.metrics.estimated_reads_per_action, 3.0);
    }

    #[test]
    fn test_missing_read_estimates_count_as_zero() {
        let result = validate_performance(&plan_with_reads(&[None, Some(2.0), None]));
        assert!(result.valid);
        assert_eq!(result.metrics.estimated_reads_per_action, 2.0);
    }

    #[test]
    fn test_multiple_issues() {
        let mut plan = plan_with_content(20_000);
        plan.db = plan_with_reads(&[Some(5.0)]).db;
        let result = validate_performance(&plan);
        assert!(!result.valid);
        assert_eq!(result.issues.len(), 2);
        assert!(result.issues[1].starts_with("Reads 5"));
    }

    #[test]
    fn test_custom_budget() {
        let budget = BudgetConfig {
            max_reads_per_action: 4.0,
            ..BudgetConfig::default()
        };
        let result = validate_performance_with(&plan_with_reads(&[Some(3.0)]), &budget);
        assert!(result.valid);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // 'é' is one UTF-16 unit but two UTF-8 bytes
        let plan = Plan {
            ui: UiPlan {
                patches: vec![Patch::new("a.jsx", "é".repeat(17_000))],
            },
            ..Plan::default()
        };
        assert!(validate_performance(&plan).valid);
    }
}
